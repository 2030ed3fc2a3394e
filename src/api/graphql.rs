use actix_web::{HttpResponse, Responder, get, post, web};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::graphql::BoardSchema;

// 모든 쿼리/뮤테이션이 지나는 단일 엔드포인트
#[post("/graphql")]
pub async fn graphql(schema: web::Data<BoardSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

#[get("/graphql")]
pub async fn graphql_playground() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
