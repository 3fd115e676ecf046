// Central place for save-structure keys and editing limits.
// Keep these out of the domain modules to reduce duplication and make
// format tweaks safer.

// OpenXcom game-document keys (OX_ prefix).
pub const OX_FUNDS: &str = "funds";
pub const OX_BASES: &str = "bases";
pub const OX_NAME: &str = "name";
pub const OX_DIFFICULTY: &str = "difficulty";
pub const OX_MONTHS_PASSED: &str = "monthsPassed";
pub const OX_DAYS_PASSED: &str = "daysPassed";
pub const OX_TIME: &str = "time";

// Per-base collections.
pub const OX_FACILITIES: &str = "facilities";
pub const OX_SOLDIERS: &str = "soldiers";
pub const OX_RESEARCH: &str = "research";
pub const OX_PRODUCTIONS: &str = "productions";
pub const OX_ITEMS: &str = "items";

// Facility fields.
pub const OX_TYPE: &str = "type";
pub const OX_BUILD_TIME: &str = "buildTime";
pub const OX_POS_X: &str = "x";
pub const OX_POS_Y: &str = "y";

// Research / production fields.
pub const OX_PROJECT: &str = "project";
pub const OX_ITEM: &str = "item";
pub const OX_ASSIGNED: &str = "assigned";
pub const OX_SPENT: &str = "spent";
pub const OX_COST: &str = "cost";
pub const OX_AMOUNT: &str = "amount";
pub const OX_INFINITE: &str = "infinite";

// Soldier fields.
pub const OX_RANK: &str = "rank";
pub const OX_MISSIONS: &str = "missions";
pub const OX_KILLS: &str = "kills";
pub const OX_CURRENT_STATS: &str = "currentStats";
pub const OX_INITIAL_STATS: &str = "initialStats";

// Header (metadata document) keys.
pub const OX_HDR_NAME: &str = "name";
pub const OX_HDR_VERSION: &str = "version";
pub const OX_HDR_ENGINE: &str = "engine";

// The twelve editable soldier stats. OpenXcom stores each as an 8-bit value.
pub const SOLDIER_STATS: [&str; 12] = [
    "tu",
    "stamina",
    "health",
    "bravery",
    "reactions",
    "firing",
    "throwing",
    "strength",
    "psiStrength",
    "psiSkill",
    "melee",
    "mana",
];

pub const STAT_MIN: i64 = 0;
pub const STAT_MAX: i64 = 255;

// On-disk funds convention: index 0 holds the previous period's balance and
// index 1 the current one. Counter-intuitive, but it is what the engine
// writes; editors must not "fix" it.
pub const FUNDS_PREVIOUS: usize = 0;
pub const FUNDS_CURRENT: usize = 1;

// Item names use a STR_ prefix in the save; strip it for display.
pub const STR_PREFIX: &str = "STR_";

// Backup layout: `<stem>_<stamp>.bak` inside a sibling `backups/` directory.
pub const BACKUP_DIR: &str = "backups";
pub const BACKUP_EXT: &str = "bak";
pub const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const BACKUP_RESTORE_TAG: &str = "before_restore";

// YAML document separator between the metadata header and the game state.
pub const DOC_SEPARATOR: &str = "---\n";
