//! Demo records written into an empty bug collection when
//! `storage.seed_demo_data` is enabled.

use crate::db::models::Bug;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

pub fn demo_bugs() -> Vec<Bug> {
    let now = chrono::Utc::now().timestamp_millis();

    vec![
        Bug::new("Infinite Loop Detected", 4)
            .with_description(
                "The data processing module never returns when handed arrays \
                 with more than 1000 items, freezing the page.",
            )
            .with_labels(["critical", "performance"])
            .with_created_at(now - 3 * DAY_MS),
        Bug::new("Keyboard Not Found", 3)
            .with_description("Key events are not captured in any text input field.")
            .with_labels(["ui"])
            .with_created_at(now - 2 * DAY_MS),
        Bug::new("404 Coffee Not Found", 2)
            .with_description("The coffee machine endpoint answers 404 to every brew request.")
            .with_created_at(now - DAY_MS),
        Bug::new("Unexpected Response", 1)
            .with_description("API responses do not match the documented schema.")
            .with_labels(["backend", "need-CR"])
            .with_created_at(now),
    ]
}
