//! Static team table and source-data quirks
//!
//! The stats API identifies teams three different ways (numeric id, slug,
//! abbreviation). These tables are the explicit mapping between them.

/// One NBA franchise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    /// stats.nba.com team id
    pub id: u64,
    pub abbr: &'static str,
    pub name: &'static str,
    /// Slug used by the standings endpoint
    pub slug: &'static str,
}

const fn team(id: u64, abbr: &'static str, name: &'static str, slug: &'static str) -> Team {
    Team {
        id,
        abbr,
        name,
        slug,
    }
}

/// All 30 teams, ordered by abbreviation
pub const TEAMS: [Team; 30] = [
    team(1610612737, "ATL", "Atlanta Hawks", "hawks"),
    team(1610612738, "BOS", "Boston Celtics", "celtics"),
    team(1610612751, "BKN", "Brooklyn Nets", "nets"),
    team(1610612766, "CHA", "Charlotte Hornets", "hornets"),
    team(1610612741, "CHI", "Chicago Bulls", "bulls"),
    team(1610612739, "CLE", "Cleveland Cavaliers", "cavaliers"),
    team(1610612742, "DAL", "Dallas Mavericks", "mavericks"),
    team(1610612743, "DEN", "Denver Nuggets", "nuggets"),
    team(1610612765, "DET", "Detroit Pistons", "pistons"),
    team(1610612744, "GSW", "Golden State Warriors", "warriors"),
    team(1610612745, "HOU", "Houston Rockets", "rockets"),
    team(1610612754, "IND", "Indiana Pacers", "pacers"),
    team(1610612746, "LAC", "LA Clippers", "clippers"),
    team(1610612747, "LAL", "Los Angeles Lakers", "lakers"),
    team(1610612763, "MEM", "Memphis Grizzlies", "grizzlies"),
    team(1610612748, "MIA", "Miami Heat", "heat"),
    team(1610612749, "MIL", "Milwaukee Bucks", "bucks"),
    team(1610612750, "MIN", "Minnesota Timberwolves", "timberwolves"),
    team(1610612740, "NOP", "New Orleans Pelicans", "pelicans"),
    team(1610612752, "NYK", "New York Knicks", "knicks"),
    team(1610612760, "OKC", "Oklahoma City Thunder", "thunder"),
    team(1610612753, "ORL", "Orlando Magic", "magic"),
    team(1610612755, "PHI", "Philadelphia 76ers", "76ers"),
    team(1610612756, "PHX", "Phoenix Suns", "suns"),
    team(1610612757, "POR", "Portland Trail Blazers", "blazers"),
    team(1610612758, "SAC", "Sacramento Kings", "kings"),
    team(1610612759, "SAS", "San Antonio Spurs", "spurs"),
    team(1610612761, "TOR", "Toronto Raptors", "raptors"),
    team(1610612762, "UTA", "Utah Jazz", "jazz"),
    team(1610612764, "WAS", "Washington Wizards", "wizards"),
];

/// Logo files under legacy names that the front-end still references
///
/// `(abbreviation, legacy file name)`. The exporter never renames these; it
/// only reports them.
pub const LEGACY_LOGO_FILES: &[(&str, &str)] = &[("UTA", "UTH_logo.svg")];

pub fn by_abbr(abbr: &str) -> Option<&'static Team> {
    TEAMS.iter().find(|t| t.abbr == abbr)
}

pub fn by_id(id: u64) -> Option<&'static Team> {
    TEAMS.iter().find(|t| t.id == id)
}

/// Map a standings slug to an abbreviation
///
/// Unknown slugs fall back to their first three characters upper-cased.
pub fn abbr_for_slug(slug: &str) -> String {
    match TEAMS.iter().find(|t| t.slug == slug) {
        Some(team) => team.abbr.to_string(),
        None => slug.chars().take(3).collect::<String>().to_uppercase(),
    }
}

/// Legacy logo file name for a team, if it has one
pub fn legacy_logo_file(abbr: &str) -> Option<&'static str> {
    LEGACY_LOGO_FILES
        .iter()
        .find(|(a, _)| *a == abbr)
        .map(|(_, file)| *file)
}
