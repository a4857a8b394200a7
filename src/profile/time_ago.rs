//! Croatian relative time ("prije 3 dana").

use chrono::{DateTime, Utc};

/// Pick the Croatian plural form for `n`: 1, 21, 31… take `one`; 2–4, 22–24…
/// take `few`; everything else (including 11–14) takes `many`.
fn plural<'a>(n: i64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let last = n % 10;
    let last_two = n % 100;
    if last == 1 && last_two != 11 {
        one
    } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
        few
    } else {
        many
    }
}

/// Relative description of `then` as seen at `now`. Future instants read as "just now".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "upravo sada".to_string()
    } else if minutes < 60 {
        format!("prije {} {}", minutes, plural(minutes, "minutu", "minute", "minuta"))
    } else if hours < 24 {
        format!("prije {} {}", hours, plural(hours, "sat", "sata", "sati"))
    } else if days < 7 {
        format!("prije {} {}", days, plural(days, "dan", "dana", "dana"))
    } else if days < 30 {
        let weeks = days / 7;
        format!("prije {} {}", weeks, plural(weeks, "tjedan", "tjedna", "tjedana"))
    } else if days < 365 {
        let months = days / 30;
        format!("prije {} {}", months, plural(months, "mjesec", "mjeseca", "mjeseci"))
    } else {
        let years = days / 365;
        format!("prije {} {}", years, plural(years, "godinu", "godine", "godina"))
    }
}
