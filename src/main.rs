use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use tracing_log::log::info;

use rusty_board::api;
use rusty_board::db::init_db;
use rusty_board::graphql::build_schema;
use rusty_board::migration::{Migrator, MigratorTrait};
use rusty_board::telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "rusty_board".into(),
        "info,sqlx=debug".into(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    info!("애플리케이션 시작 중...");

    dotenv().ok();
    info!("환경 변수 로드 완료");

    let db = init_db().await?;
    info!("데이터베이스 마이그레이션 실행 중...");
    Migrator::up(&db, None).await?;
    info!("마이그레이션 완료");

    let schema = build_schema(db);
    let schema_data = Data::new(schema);

    info!("서버 시작 중: http://127.0.0.1:8080/graphql");
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(schema_data.clone())
            .service(api::health_check)
            .service(api::graphql)
            .service(api::graphql_playground)
    })
        .bind(("127.0.0.1", 8080))?
        .run()
        .await?;

    Ok(())
}
