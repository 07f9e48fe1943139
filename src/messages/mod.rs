mod moderate;
mod submit;

use axum::{routing::post, Router};

use crate::AppState;

pub use moderate::{delete_message, resolve_message};
pub use submit::{submit_message, NewMessage};

/// Moods offered by the share page.
pub const MOODS: [&str; 5] = ["😊", "😔", "😡", "😰", "🥱"];

pub const EXPECTED_RESPONSES: [&str; 10] = [
    "Just say sorry and mean it",
    "Buy me food. That solves 80% of problems.",
    "Give me uninterrupted attention for 30 minutes",
    "Send a long paragraph explaining yourself",
    "Call me, no texts. Be emotional.",
    "Admit fault without any \u{201c}but\u{2026}\u{201d}",
    "Plan something nice for us \u{2013} I\u{2019}m not doing the work",
    "Surprise me (pleasantly, not emotionally)",
    "Compliment me until I smile (minimum 3 required)",
    "Promise to not repeat this. Pinky swear.",
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/message",
            post(submit::submit)
                .patch(moderate::resolve)
                .delete(moderate::delete),
        )
}
