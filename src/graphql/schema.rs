use async_graphql::{EmptySubscription, MergedObject, Schema};
use sea_orm::DatabaseConnection;

use crate::graphql::comment::{CommentMutation, CommentQuery};
use crate::graphql::epic::{EpicMutation, EpicQuery};
use crate::graphql::task::{TaskMutation, TaskQuery};
use crate::graphql::user::{UserMutation, UserQuery};

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQuery, EpicQuery, TaskQuery, CommentQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(UserMutation, EpicMutation, TaskMutation, CommentMutation);

pub type BoardSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(db: DatabaseConnection) -> BoardSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(db)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::build_schema;
    use crate::entity::user::{self, UserRole};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn sample_user(id: i32) -> user::Model {
        let now = Utc::now();
        user::Model {
            id,
            first_name: "지훈".to_string(),
            last_name: "박".to_string(),
            user_name: format!("jihoon{id}"),
            email: format!("jihoon{id}@example.com"),
            password: "$2b$12$C8qQ3mLx1rN5yE9pT2uXhO".to_string(),
            mobile_number: format!("010123400{:02}", id),
            role: UserRole::Developer,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn executes_a_query_end_to_end() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_user(1)]])
            .into_connection();
        let schema = build_schema(db);

        let resp = schema.execute("{ allUsers { id userName } }").await;
        assert!(resp.errors.is_empty());

        let data = resp.data.into_json().unwrap();
        assert_eq!(data["allUsers"][0]["userName"], "jihoon1");
    }

    #[tokio::test]
    async fn get_by_id_miss_becomes_a_query_error() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let schema = build_schema(db);

        let resp = schema.execute(r#"{ user(id: "5") { id } }"#).await;
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(resp.errors[0].message, "사용자를 찾을 수 없습니다");
    }

    #[tokio::test]
    async fn invalid_mutation_input_fails_in_the_payload() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let schema = build_schema(db);

        let resp = schema
            .execute(
                r#"mutation {
                    createUser(input: {
                        firstName: "", lastName: "", userName: "",
                        email: "broken", password: "short",
                        mobileNumber: "1", role: USER
                    }) { success message }
                }"#,
            )
            .await;
        assert!(resp.errors.is_empty());

        let data = resp.data.into_json().unwrap();
        assert_eq!(data["createUser"]["success"], false);
        assert!(data["createUser"]["message"].as_str().unwrap().contains("유효성"));
    }

    #[test]
    fn schema_exposes_every_entity_surface() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let sdl = build_schema(db).sdl();

        for field in [
            "allUsers", "user(", "createUser", "updateUser", "deleteUser",
            "allEpics", "epic(", "createEpic", "updateEpic",
            "allTasks", "task(", "createTask", "updateTask",
            "allComments", "comment(", "createComment", "updateComment",
        ] {
            assert!(sdl.contains(field), "SDL에 {field} 가 없습니다");
        }
    }

    #[test]
    fn schema_hides_password_field_on_user_type() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let sdl = build_schema(db).sdl();

        let user_block = sdl
            .split("type User {")
            .nth(1)
            .and_then(|s| s.split('}').next())
            .expect("SDL에 User 타입이 없습니다");
        assert!(!user_block.contains("password"));
    }
}
