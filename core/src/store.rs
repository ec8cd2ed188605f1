//! SQLite persistence layer for save slots.
//!
//! RULE: Only store.rs talks to the database.
//! The engine produces and consumes snapshots; it never executes SQL.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use crate::{
    error::SimResult,
    snapshot::{SaveMetadata, ShelterSnapshot},
    types::Millis,
};

pub const AUTOSAVE_SLOT: u32 = 0;
pub const MANUAL_SLOTS: std::ops::RangeInclusive<u32> = 1..=3;

/// One row of the save menu. Empty slots carry no name or metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotInfo {
    pub slot:     u32,
    pub name:     Option<String>,
    pub saved_at: Option<Millis>,
    pub metadata: Option<SaveMetadata>,
}

impl SlotInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageStats {
    pub slots_used:   usize,
    pub total_bytes:  u64,
    pub has_autosave: bool,
}

pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_saves.sql"))?;
        Ok(())
    }

    // ── Slots ──────────────────────────────────────────────────

    pub fn save_slot(&self, slot: u32, snapshot: &ShelterSnapshot) -> SimResult<()> {
        let metadata_json = serde_json::to_string(&snapshot.metadata)?;
        let snapshot_json = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO save_slots
                 (slot, name, version, saved_at, metadata_json, snapshot_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                slot,
                snapshot.name,
                snapshot.version,
                snapshot.saved_at,
                metadata_json,
                snapshot_json,
            ],
        )?;
        log::info!("save: slot {slot} written as '{}'", snapshot.name);
        Ok(())
    }

    pub fn load_slot(&self, slot: u32) -> SimResult<Option<ShelterSnapshot>> {
        let Some(json) = self.raw_slot(slot)? else {
            return Ok(None);
        };
        let snapshot: ShelterSnapshot = serde_json::from_str(&json)?;
        log::info!("load: slot {slot} read '{}'", snapshot.name);
        Ok(Some(snapshot))
    }

    /// Returns true if a save was removed.
    pub fn delete_slot(&self, slot: u32) -> SimResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM save_slots WHERE slot = ?1", params![slot])?;
        Ok(removed > 0)
    }

    /// The manual slots, filled or not, in slot order.
    pub fn list_slots(&self) -> SimResult<Vec<SlotInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, saved_at, metadata_json FROM save_slots WHERE slot = ?1",
        )?;
        let mut out = Vec::new();
        for slot in MANUAL_SLOTS {
            let row = stmt
                .query_row(params![slot], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })
                .optional()?;
            let info = match row {
                Some((name, saved_at, metadata_json)) => SlotInfo {
                    slot,
                    name:     Some(name),
                    saved_at: Some(saved_at),
                    metadata: Some(serde_json::from_str(&metadata_json)?),
                },
                None => SlotInfo { slot, name: None, saved_at: None, metadata: None },
            };
            out.push(info);
        }
        Ok(out)
    }

    // ── Autosave ───────────────────────────────────────────────

    pub fn autosave(&self, snapshot: &ShelterSnapshot) -> SimResult<()> {
        self.save_slot(AUTOSAVE_SLOT, snapshot)
    }

    pub fn has_autosave(&self) -> SimResult<bool> {
        Ok(self.raw_slot(AUTOSAVE_SLOT)?.is_some())
    }

    // ── Import / export ────────────────────────────────────────

    /// Pretty-printed JSON of a slot, or None if it is empty.
    pub fn export_slot(&self, slot: u32) -> SimResult<Option<String>> {
        match self.load_slot(slot)? {
            Some(snapshot) => Ok(Some(serde_json::to_string_pretty(&snapshot)?)),
            None => Ok(None),
        }
    }

    /// Store a save received as JSON. Malformed, incompatible or
    /// structurally invalid saves are rejected and the slot is untouched.
    pub fn import_slot(&self, slot: u32, json: &str) -> SimResult<ShelterSnapshot> {
        let snapshot: ShelterSnapshot = serde_json::from_str(json)?;
        snapshot.check()?;
        self.save_slot(slot, &snapshot)?;
        Ok(snapshot)
    }

    // ── Housekeeping ───────────────────────────────────────────

    pub fn clear_all(&self) -> SimResult<()> {
        self.conn.execute("DELETE FROM save_slots", [])?;
        log::info!("store: all slots cleared");
        Ok(())
    }

    pub fn storage_stats(&self) -> SimResult<StorageStats> {
        let (slots_used, total_bytes) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(LENGTH(snapshot_json)), 0) FROM save_slots",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;
        Ok(StorageStats {
            slots_used:   slots_used as usize,
            total_bytes:  total_bytes as u64,
            has_autosave: self.has_autosave()?,
        })
    }

    fn raw_slot(&self, slot: u32) -> SimResult<Option<String>> {
        let json = self
            .conn
            .query_row(
                "SELECT snapshot_json FROM save_slots WHERE slot = ?1",
                params![slot],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(json)
    }
}
