//! Team-name alias expansion.
//!
//! Schedule rows name teams inconsistently (abbreviation, city, or
//! nickname), so a query like "bills" has to match "BUF" and
//! "Buffalo" too. Each nickname maps to its known abbreviation and
//! city aliases; the original query is always included.

/// Alias table keyed by nickname. Abbreviations follow the provider's
/// team keys.
const TEAM_ALIASES: &[(&str, &[&str])] = &[
    ("bills", &["buf", "buffalo"]),
    ("buffalo", &["buf", "bills"]),
    ("dolphins", &["mia", "miami"]),
    ("miami", &["mia", "dolphins"]),
    ("patriots", &["ne", "new england"]),
    ("jets", &["nyj", "new york jets"]),
    ("ravens", &["bal", "baltimore"]),
    ("bengals", &["cin", "cincinnati"]),
    ("browns", &["cle", "cleveland"]),
    ("steelers", &["pit", "pittsburgh"]),
    ("texans", &["hou", "houston"]),
    ("colts", &["ind", "indianapolis"]),
    ("jaguars", &["jax", "jacksonville"]),
    ("titans", &["ten", "tennessee"]),
    ("broncos", &["den", "denver"]),
    ("chiefs", &["kc", "kansas city"]),
    ("raiders", &["lv", "las vegas"]),
    ("chargers", &["lac", "los angeles chargers"]),
    ("cowboys", &["dal", "dallas"]),
    ("giants", &["nyg", "new york giants"]),
    ("eagles", &["phi", "philadelphia"]),
    ("commanders", &["was", "washington"]),
    ("bears", &["chi", "chicago"]),
    ("lions", &["det", "detroit"]),
    ("packers", &["gb", "green bay"]),
    ("vikings", &["min", "minnesota"]),
    ("falcons", &["atl", "atlanta"]),
    ("panthers", &["car", "carolina"]),
    ("saints", &["no", "new orleans"]),
    ("buccaneers", &["tb", "tampa bay"]),
    ("cardinals", &["ari", "arizona"]),
    ("rams", &["lar", "los angeles rams"]),
    ("seahawks", &["sea", "seattle"]),
    ("49ers", &["sf", "san francisco"]),
];

/// Known search variations for a team query: the lowercased query
/// itself, plus abbreviation and city aliases when the nickname is
/// recognised.
pub fn name_variations(team: &str) -> Vec<String> {
    let name = team.trim().to_lowercase();
    let mut variations = vec![name.clone()];

    if let Some((_, aliases)) = TEAM_ALIASES.iter().find(|(nick, _)| *nick == name) {
        variations.extend(aliases.iter().map(|a| a.to_string()));
    }

    variations
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
