mod delete;
mod list;
mod new;
mod page;
pub mod slug;

use axum::{routing::get, Router};

use crate::AppState;

pub use delete::remove_person;
pub use list::{persons_with_messages, PersonWithMessages};
pub use new::create_person;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/person", get(list::list_persons).post(new::new_person).delete(delete::delete_person))
        .route("/share/{slug}", get(page::share))
}
