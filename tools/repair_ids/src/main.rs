//! Finds courses in the stored list whose `id` is missing, malformed or
//! shared with an earlier course (timestamp collisions), and assigns fresh
//! ids. Courses without `createdAt` get the current time.
//!
//! Dry run by default; pass `--apply` to write the repaired list back.

use std::collections::HashSet;
use std::env;

use chrono::{SecondsFormat, Utc};
use dotenvy::dotenv;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

fn is_dry_run() -> bool {
    !std::env::args().any(|a| a == "--apply")
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    result: Option<Value>,
}

#[derive(Debug, PartialEq)]
struct Repair {
    index: usize,
    old_id: Option<i64>,
    new_id: Option<i64>,
    created_at_filled: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let base_url = env::var("KV_REST_API_URL")?;
    let token = env::var("KV_REST_API_TOKEN")?;
    let key = env::var("COURSES_KEY").unwrap_or_else(|_| "campus-courses".to_string());

    let client = Client::new();

    let mut courses = fetch_courses(&client, &base_url, &token, &key).await?;
    let now = Utc::now();
    let repairs = plan_repairs(
        &mut courses,
        now.timestamp_millis(),
        &now.to_rfc3339_opts(SecondsFormat::Millis, true),
    );

    let dry_run = is_dry_run();

    for repair in &repairs {
        let name = courses[repair.index]
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("<unnamed>");
        let prefix = if dry_run { "[DRY RUN] Would update" } else { "Updating" };
        if let Some(new_id) = repair.new_id {
            println!("{} course \"{}\" id {:?} -> {}", prefix, name, repair.old_id, new_id);
        }
        if repair.created_at_filled {
            println!("{} course \"{}\" createdAt (was missing)", prefix, name);
        }
    }

    if !dry_run && !repairs.is_empty() {
        save_courses(&client, &base_url, &token, &key, &courses).await?;
    }

    println!("Courses repaired: {} / {}", repairs.len(), courses.len());

    Ok(())
}

/// Fix ids and creation timestamps in place. New ids start above every id
/// already in the list (and above `now_ms`).
fn plan_repairs(courses: &mut [Value], now_ms: i64, now_iso: &str) -> Vec<Repair> {
    let mut next_id = courses
        .iter()
        .filter_map(|c| c.get("id").and_then(|id| id.as_i64()))
        .max()
        .map_or(now_ms, |max| max.max(now_ms - 1) + 1);

    let mut seen = HashSet::new();
    let mut repairs = Vec::new();

    for (index, course) in courses.iter_mut().enumerate() {
        let Some(record) = course.as_object_mut() else {
            continue;
        };

        let old_id = record.get("id").and_then(|id| id.as_i64());
        let new_id = match old_id {
            Some(id) if seen.insert(id) => None,
            _ => {
                let id = next_id;
                next_id += 1;
                seen.insert(id);
                record.insert("id".to_string(), Value::from(id));
                Some(id)
            }
        };

        let created_at_filled = match record.get("createdAt") {
            Some(Value::String(s)) if !s.is_empty() => false,
            _ => {
                record.insert("createdAt".to_string(), Value::from(now_iso));
                true
            }
        };

        if new_id.is_some() || created_at_filled {
            repairs.push(Repair {
                index,
                old_id,
                new_id,
                created_at_filled,
            });
        }
    }

    repairs
}

async fn fetch_courses(
    client: &Client,
    base_url: &str,
    token: &str,
    key: &str,
) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let url = format!("{}/get/{}", base_url.trim_end_matches('/'), key);
    let res: CommandResponse = client
        .get(&url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let courses = match res.result {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(text)) => serde_json::from_str(&text)?,
        Some(other) => serde_json::from_value(other)?,
    };
    Ok(courses)
}

async fn save_courses(
    client: &Client,
    base_url: &str,
    token: &str,
    key: &str,
    courses: &[Value],
) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("{}/set/{}", base_url.trim_end_matches('/'), key);

    client
        .post(&url)
        .bearer_auth(token)
        .body(serde_json::to_string(courses)?)
        .send()
        .await?
        .error_for_status()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: &str = "2025-06-01T00:00:00.000Z";

    #[test]
    fn reassigns_duplicate_and_missing_ids() {
        let mut courses = vec![
            json!({ "id": 100, "name": "a", "createdAt": NOW }),
            json!({ "id": 100, "name": "b", "createdAt": NOW }),
            json!({ "name": "c", "createdAt": NOW }),
            json!({ "id": "7", "name": "d", "createdAt": NOW }),
        ];

        let repairs = plan_repairs(&mut courses, 50, NOW);

        assert_eq!(repairs.len(), 3);
        assert_eq!(courses[0]["id"], 100);
        assert_eq!(courses[1]["id"], 101);
        assert_eq!(courses[2]["id"], 102);
        assert_eq!(courses[3]["id"], 103);
        assert_eq!(repairs[0].old_id, Some(100));
        assert_eq!(repairs[2].old_id, None);
    }

    #[test]
    fn fills_missing_created_at_only() {
        let mut courses = vec![json!({ "id": 1, "name": "a" })];

        let repairs = plan_repairs(&mut courses, 1_000, NOW);

        assert_eq!(
            repairs,
            vec![Repair {
                index: 0,
                old_id: Some(1),
                new_id: None,
                created_at_filled: true,
            }]
        );
        assert_eq!(courses[0]["createdAt"], NOW);
    }

    #[test]
    fn new_ids_start_at_now_when_list_is_older() {
        let mut courses = vec![
            json!({ "id": 10, "createdAt": NOW }),
            json!({ "createdAt": NOW }),
        ];
        plan_repairs(&mut courses, 5_000, NOW);
        assert_eq!(courses[1]["id"], 5_000);
    }
}
