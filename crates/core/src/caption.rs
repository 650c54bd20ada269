//! Post caption rendering.
//!
//! Rendering is pure: the same payload always yields byte-identical text,
//! which keeps retried jobs idempotent (re-editing to identical content is
//! a platform no-op).

use crate::domain::{ChannelLinks, CsMap, GrenadeKind, PublishPayload, Side};

/// Round length used to convert "seconds from round start" into the time
/// shown on the in-game clock (1:55 competitive round).
const ROUND_DURATION_SECS: u32 = 115;

const fn map_icon(map: CsMap) -> &'static str {
    match map {
        CsMap::Ancient => "🗿",
        CsMap::Anubis => "🕌",
        CsMap::Cache => "📦",
        CsMap::Dust2 => "🏜",
        CsMap::Inferno => "🔥",
        CsMap::Mirage => "🌴",
        CsMap::Nuke => "☢",
        CsMap::Overpass => "⛲",
        CsMap::Train => "🚂",
        CsMap::Vertigo => "🏢",
    }
}

const fn grenade_icon(grenade: GrenadeKind) -> &'static str {
    match grenade {
        GrenadeKind::He => "💣",
        GrenadeKind::Flash => "👁",
        GrenadeKind::Molotov => "🔥",
        GrenadeKind::Smoke | GrenadeKind::Decoy => "☁",
    }
}

const fn side_icon(side: Side) -> &'static str {
    match side {
        Side::Ct => "🔷",
        Side::T => "🔶",
    }
}

const fn difficulty_icon(difficulty: u8) -> &'static str {
    match difficulty {
        1 => "🟢",
        2 => "🟠",
        _ => "🔴",
    }
}

/// Render the channel post caption for a lineup.
///
/// HTML parse mode; footer links point at the companion bot's web app and
/// the channel's pinned tag-cloud post.
#[must_use]
pub fn render_caption(payload: &PublishPayload, links: &ChannelLinks) -> String {
    let best_timing = payload.best_timing.map_or_else(String::new, |timing| {
        let clock = ROUND_DURATION_SECS.saturating_sub(timing);
        format!("\n⌛ {}:{:02}", clock / 60, clock % 60)
    });

    let notes = payload
        .notes
        .as_deref()
        .map_or_else(String::new, |notes| format!("\nℹ️ {notes}"));

    format!(
        "<b>{map_icon} {map}  {grenade_icon} {grenade}</b>\
         \n\
         \n{side_icon} {from} ➜ {to}\
         \n\
         \n{difficulty_icon} {key_combo}\
         {best_timing}\
         {notes}\
         \n\n\
         \n📱 <a href=\"{bot_url}/app\">App</a>\
         \n#️⃣ <a href=\"{channel_url}/5\">Tag cloud</a>\
         \n#{map} #{grenade} #{side}",
        map_icon = map_icon(payload.map),
        map = payload.map.as_str(),
        grenade_icon = grenade_icon(payload.grenade),
        grenade = payload.grenade.as_str(),
        side_icon = side_icon(payload.side),
        side = payload.side.as_str(),
        from = payload.from_position,
        to = payload.to_position,
        difficulty_icon = difficulty_icon(payload.difficulty),
        key_combo = payload.key_combo,
        bot_url = links.bot_url,
        channel_url = links.channel_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaRefs;

    fn payload() -> PublishPayload {
        PublishPayload {
            content_id: 42,
            map: CsMap::Mirage,
            grenade: GrenadeKind::Smoke,
            side: Side::T,
            difficulty: 2,
            from_position: "T Ramp".to_string(),
            to_position: "Window".to_string(),
            key_combo: "W + LMB".to_string(),
            best_timing: Some(12),
            notes: Some("Jump throw bind required".to_string()),
            media: MediaRefs {
                video: "vid".to_string(),
                setup_photo: "setup".to_string(),
                finish_photo: "finish".to_string(),
            },
            post_id: None,
        }
    }

    fn links() -> ChannelLinks {
        ChannelLinks {
            bot_url: "https://t.me/example_bot".to_string(),
            channel_url: "https://t.me/example_channel".to_string(),
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let payload = payload();
        let links = links();
        assert_eq!(
            render_caption(&payload, &links),
            render_caption(&payload, &links)
        );
    }

    #[test]
    fn caption_contains_positions_combo_and_hashtags() {
        let caption = render_caption(&payload(), &links());

        assert!(caption.contains("T Ramp ➜ Window"));
        assert!(caption.contains("W + LMB"));
        assert!(caption.ends_with("#MIRAGE #SMOKE #T"));
        assert!(caption.contains("https://t.me/example_bot/app"));
    }

    #[test]
    fn best_timing_shows_round_clock_time() {
        // 12 seconds into a 1:55 round leaves 1:43 on the clock.
        let caption = render_caption(&payload(), &links());
        assert!(caption.contains("⌛ 1:43"));

        let mut late = payload();
        late.best_timing = Some(110);
        let caption = render_caption(&late, &links());
        assert!(caption.contains("⌛ 0:05"), "seconds are zero padded");
    }

    #[test]
    fn optional_lines_are_omitted_when_absent() {
        let mut bare = payload();
        bare.best_timing = None;
        bare.notes = None;
        let caption = render_caption(&bare, &links());

        assert!(!caption.contains('⌛'));
        assert!(!caption.contains("ℹ️"));
    }
}
