//! Fixed texts and chip sets used by the intent handlers.

use crate::agent::Reply;
use crate::models::{CallToAction, CtaAction, MessageMetadata, QuickReply, SpotRecommendation};

pub const APOLOGY: &str =
    "Sorry, something went wrong on my side while looking that up. Please try again, or get in touch with the team and we'll help you plan your trip.";

pub const GENERAL_HELP: &str = "Hi, I'm Kaite! I can suggest kitespots for your level, explain which wind you need, find spots with waves, or show trips that still have free cabins. What are you looking for?";

pub const BEGINNER_INTRO: &str = "Great choice to start kiting! For your first sessions you want flat, shallow water and steady, moderate wind.";

pub const WIND_INTRO: &str = "Most riders are comfortable between 12 and 25 knots. Lighter riders and bigger kites need less, strong trade and thermal winds suit smaller kites.";

pub const WAVES_INTRO: &str = "Looking for waves? These spots have proper swell and enough wind to ride it.";

pub const BOOKING_INTRO: &str = "Here are upcoming trips that still have space.";

pub const BOOKING_SOLD_OUT: &str = "All upcoming trips are fully booked right now. Leave us a message and we'll let you know when new dates open.";

pub const DESTINATION_INTRO: &str = "Here's what you can find there.";

pub fn general_chips() -> Vec<QuickReply> {
    ["Beginner spots", "Wave spots", "Wind conditions", "Available trips"]
        .into_iter()
        .map(QuickReply::new)
        .collect()
}

pub fn contact_button() -> CallToAction {
    CallToAction::new("Contact the team", CtaAction::ContactTeam)
}

pub fn browse_button() -> CallToAction {
    CallToAction::new("Browse all trips", CtaAction::BrowseTrips)
}

pub fn apology() -> Reply {
    Reply {
        content: APOLOGY.to_string(),
        metadata: MessageMetadata {
            buttons: vec![contact_button()],
            ..MessageMetadata::default()
        },
    }
}

pub fn general() -> Reply {
    Reply {
        content: GENERAL_HELP.to_string(),
        metadata: MessageMetadata {
            quick_replies: general_chips(),
            ..MessageMetadata::default()
        },
    }
}

/// "Punta Trettu (Italy), Porto Pollo (Italy)"
pub fn spot_list(spots: &[SpotRecommendation]) -> String {
    spots
        .iter()
        .map(|s| format!("{} ({})", s.name, s.country))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn wind_for(knots: u32) -> String {
    match knots {
        0..=11 => format!("{knots} knots is on the light side. You'll want a big kite or a foil board."),
        12..=18 => format!("{knots} knots is a relaxed, all-round wind for most riders."),
        19..=25 => format!("{knots} knots is a solid breeze, great for jumping on a mid-size kite."),
        _ => format!("{knots} knots is strong wind, best for experienced riders on small kites."),
    }
}

/// Wind question with a speed none of the spots covers
pub fn no_spot_for(knots: u32) -> Reply {
    Reply {
        content: format!(
            "None of our spots regularly sees {knots} knots. Between them they cover 12 to 40 knots, so tell me what you usually ride and I'll find a match."
        ),
        metadata: MessageMetadata {
            quick_replies: general_chips(),
            buttons: vec![browse_button()],
            ..MessageMetadata::default()
        },
    }
}
