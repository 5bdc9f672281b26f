//! SQL schema definitions.

/// Complete schema for tally v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Sales
-- ============================================================

CREATE TABLE IF NOT EXISTS sales (
    guild_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    total_sales INTEGER NOT NULL DEFAULT 0,
    self_gen INTEGER NOT NULL DEFAULT 0,
    set_sales INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (guild_id, user_id)
);

-- ============================================================
-- Gym check-ins
-- ============================================================

CREATE TABLE IF NOT EXISTS gym (
    guild_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    checkins INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (guild_id, user_id)
);

-- ============================================================
-- Daily appointments
-- ============================================================

-- `day` is an ISO date string (YYYY-MM-DD) rendered in the configured
-- report time zone. The key changing as days pass is the daily reset;
-- there is no rollover job.
CREATE TABLE IF NOT EXISTS daily_appts (
    guild_id TEXT NOT NULL,
    day TEXT NOT NULL,
    user_id TEXT NOT NULL,
    appt_count INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (guild_id, day, user_id)
);

-- ============================================================
-- Blitz campaigns
-- ============================================================

CREATE TABLE IF NOT EXISTS blitz_campaigns (
    guild_id TEXT NOT NULL,
    name TEXT NOT NULL,
    started_at INTEGER NOT NULL,
    ended_at INTEGER,
    active INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (guild_id, name)
);

-- At most one active campaign per guild.
CREATE UNIQUE INDEX IF NOT EXISTS idx_blitz_one_active
    ON blitz_campaigns(guild_id) WHERE active = 1;

CREATE INDEX IF NOT EXISTS idx_blitz_ended
    ON blitz_campaigns(guild_id, ended_at);

CREATE TABLE IF NOT EXISTS blitz_appts (
    guild_id TEXT NOT NULL,
    campaign TEXT NOT NULL,
    day TEXT NOT NULL,
    user_id TEXT NOT NULL,
    appt_count INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (guild_id, campaign, day, user_id)
);
"#;
