//! Request paths for the Torn API endpoints tornboard uses

/// `/user/` for the key owner, or `/user/{id}` for another player.
pub fn user(id: Option<u64>, selections: &str) -> String {
    match id {
        Some(id) => format!("/user/{}?selections={}", id, selections),
        None => format!("/user/?selections={}", selections),
    }
}

pub fn company(id: Option<u64>, selections: &str) -> String {
    match id {
        Some(id) => format!("/company/{}?selections={}", id, selections),
        None => format!("/company/?selections={}", selections),
    }
}

pub fn faction(id: Option<u64>, selections: &str) -> String {
    match id {
        Some(id) => format!("/faction/{}?selections={}", id, selections),
        None => format!("/faction/?selections={}", selections),
    }
}

/// v2 faction section, e.g. `basic`, `members`, `rankedwars`, `territory`.
pub fn faction_v2(id: u64, section: &str) -> String {
    format!("/v2/faction/{}/{}", id, section)
}

pub fn torn(selections: &str) -> String {
    format!("/torn/?selections={}", selections)
}
