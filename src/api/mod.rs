mod graphql;
mod health_check;

pub use crate::api::graphql::{graphql, graphql_playground};
pub use crate::api::health_check::health_check;
