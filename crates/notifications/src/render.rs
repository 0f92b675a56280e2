//! Plain-text rendering of notifications, shared by all channels.

use std::fmt::Write as _;

use metal_detector_core::channels::NotificationKind;
use metal_detector_core::release::Release;
use metal_detector_core::traits::{NotificationEvent, NotificationPayload};

/// Subject line (email) or headline (Telegram) for a notification kind.
pub fn subject(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::PeriodicDigest => "Your new metal releases",
        NotificationKind::TodaysReleases => "Today's metal releases",
        NotificationKind::TodaysAnnouncements => "Today's metal announcements",
    }
}

/// Render the full text body of `event`.
pub fn body(event: &NotificationEvent) -> String {
    let mut out = format!("Hi {},\n\n", event.recipient.username);

    match &event.payload {
        NotificationPayload::PeriodicDigest {
            upcoming_releases,
            recent_releases,
        } => {
            section(
                &mut out,
                "Upcoming releases of artists you follow:",
                "No upcoming releases.",
                upcoming_releases,
            );
            out.push('\n');
            section(
                &mut out,
                "Recently released:",
                "No recent releases.",
                recent_releases,
            );
        }
        NotificationPayload::TodaysReleases { releases } => {
            section(
                &mut out,
                "Released today by artists you follow:",
                "",
                releases,
            );
        }
        NotificationPayload::TodaysAnnouncements { releases } => {
            section(
                &mut out,
                "Announced today by artists you follow:",
                "",
                releases,
            );
        }
    }

    out.push_str("\nYour Metal Detector\n");
    out
}

/// One line per release: `artist - album (yyyy-mm-dd)`.
pub fn release_line(release: &Release) -> String {
    format!(
        "{} - {} ({})",
        release.artist_name,
        release.album_title,
        release.release_date.format("%Y-%m-%d")
    )
}

fn section(out: &mut String, heading: &str, empty: &str, releases: &[Release]) {
    out.push_str(heading);
    out.push('\n');
    if releases.is_empty() {
        out.push_str(empty);
        out.push('\n');
        return;
    }
    for release in releases {
        let _ = writeln!(out, "- {}", release_line(release));
    }
}
