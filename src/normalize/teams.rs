//! NFL team names, abbreviations and the short forms providers use.
//!
//! Kalshi tickers use abbreviations, Kalshi subtitles use cities, Polymarket
//! questions often use nicknames, and sportsbooks use full names. Every form
//! resolves to the full name.

/// `(abbreviation, full name, nickname)`; the city is what precedes the nickname
const NFL_TEAMS: [(&str, &str, &str); 32] = [
    ("ARI", "Arizona Cardinals", "Cardinals"),
    ("ATL", "Atlanta Falcons", "Falcons"),
    ("BAL", "Baltimore Ravens", "Ravens"),
    ("BUF", "Buffalo Bills", "Bills"),
    ("CAR", "Carolina Panthers", "Panthers"),
    ("CHI", "Chicago Bears", "Bears"),
    ("CIN", "Cincinnati Bengals", "Bengals"),
    ("CLE", "Cleveland Browns", "Browns"),
    ("DAL", "Dallas Cowboys", "Cowboys"),
    ("DEN", "Denver Broncos", "Broncos"),
    ("DET", "Detroit Lions", "Lions"),
    ("GB", "Green Bay Packers", "Packers"),
    ("HOU", "Houston Texans", "Texans"),
    ("IND", "Indianapolis Colts", "Colts"),
    ("JAX", "Jacksonville Jaguars", "Jaguars"),
    ("KC", "Kansas City Chiefs", "Chiefs"),
    ("LV", "Las Vegas Raiders", "Raiders"),
    ("LAC", "Los Angeles Chargers", "Chargers"),
    ("LAR", "Los Angeles Rams", "Rams"),
    ("MIA", "Miami Dolphins", "Dolphins"),
    ("MIN", "Minnesota Vikings", "Vikings"),
    ("NE", "New England Patriots", "Patriots"),
    ("NO", "New Orleans Saints", "Saints"),
    ("NYG", "New York Giants", "Giants"),
    ("NYJ", "New York Jets", "Jets"),
    ("PHI", "Philadelphia Eagles", "Eagles"),
    ("PIT", "Pittsburgh Steelers", "Steelers"),
    ("SF", "San Francisco 49ers", "49ers"),
    ("SEA", "Seattle Seahawks", "Seahawks"),
    ("TB", "Tampa Bay Buccaneers", "Buccaneers"),
    ("TEN", "Tennessee Titans", "Titans"),
    ("WAS", "Washington Commanders", "Commanders"),
];

/// Full team name for an NFL abbreviation (case-insensitive)
pub fn nfl_team_name(abbr: &str) -> Option<&'static str> {
    NFL_TEAMS
        .iter()
        .find(|(a, _, _)| a.eq_ignore_ascii_case(abbr))
        .map(|(_, full, _)| *full)
}

/// Full team name for any form a provider uses: abbreviation, full name,
/// nickname, city, or city plus a nickname prefix ("Los Angeles C").
///
/// Returns `None` when the name is unknown or ambiguous ("New York").
pub fn resolve_nfl_team(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if let Some(full) = nfl_team_name(name) {
        return Some(full);
    }

    let mut found = None;
    for (_, full, nickname) in NFL_TEAMS {
        if !is_alias(name, full, nickname) {
            continue;
        }
        if found.is_some() {
            return None;
        }
        found = Some(full);
    }
    found
}

fn is_alias(name: &str, full: &str, nickname: &str) -> bool {
    let city = full
        .strip_suffix(nickname)
        .map_or(full, str::trim_end);
    if name.eq_ignore_ascii_case(full)
        || name.eq_ignore_ascii_case(nickname)
        || name.eq_ignore_ascii_case(city)
    {
        return true;
    }
    // "Los Angeles C", "New York Jets"
    name.get(..city.len())
        .filter(|head| head.eq_ignore_ascii_case(city))
        .and_then(|_| name.get(city.len()..))
        .and_then(|rest| rest.strip_prefix(' '))
        .is_some_and(|rest| {
            !rest.is_empty()
                && nickname
                    .get(..rest.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(rest))
        })
}

/// Split a run of concatenated abbreviations ("DALPHI", "KCLAC") into two
/// known teams. Returns `None` when no split, or more than one, works.
pub(crate) fn split_abbreviations(run: &str) -> Option<(&str, &str)> {
    let mut found = None;
    for mid in 2..=run.len().saturating_sub(2) {
        if !run.is_char_boundary(mid) {
            continue;
        }
        let (a, b) = run.split_at(mid);
        if nfl_team_name(a).is_some() && nfl_team_name(b).is_some() {
            if found.is_some() {
                return None;
            }
            found = Some((a, b));
        }
    }
    found
}
