use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::sequence::{self, BAN_TURNS, PICK_TURNS};

/// Players on a team roster; pick slot order maps picks to players.
pub const PLAYERS_PER_TEAM: usize = 5;
/// Picks a team makes per match.
pub const PICKS_PER_TEAM: usize = 5;
/// Ban slots a team has per match.
pub const BANS_PER_TEAM: usize = 3;
/// Cap on the legacy series-wide ban pool.
pub const GLOBAL_BAN_CAP: usize = 30;
/// Default series length when setup does not override it.
pub const DEFAULT_MAX_MATCHES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    A,
    B,
}

impl TeamId {
    pub const BOTH: [TeamId; 2] = [TeamId::A, TeamId::B];

    pub fn other(self) -> TeamId {
        match self {
            TeamId::A => TeamId::B,
            TeamId::B => TeamId::A,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamId::A => "A",
            TeamId::B => "B",
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Series created, draft not started.
    #[default]
    Ready,
    Ban,
    Pick,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Ban => "ban",
            Phase::Pick => "pick",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A confirmed ban slot: either a banned character or an explicit pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BanEntry {
    Pokemon(String),
    Skip,
}

impl BanEntry {
    pub fn pokemon(&self) -> Option<&str> {
        match self {
            BanEntry::Pokemon(id) => Some(id),
            BanEntry::Skip => None,
        }
    }
}

/// Positional view of one of a team's three ban slots. Unlike [`BanEntry`],
/// this also represents slots the team has not reached yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BanSlot {
    Banned(String),
    Skipped,
    Unset,
}

/// A pair of per-team values, indexable by [`TeamId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerTeam<T> {
    pub a: T,
    pub b: T,
}

impl<T> PerTeam<T> {
    pub fn get(&self, team: TeamId) -> &T {
        match team {
            TeamId::A => &self.a,
            TeamId::B => &self.b,
        }
    }

    pub fn get_mut(&mut self, team: TeamId) -> &mut T {
        match team {
            TeamId::A => &mut self.a,
            TeamId::B => &mut self.b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    /// Exactly five names; slot order decides which player gets which pick.
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub max_matches: usize,
}

/// Everything a rejected action can be rejected for. Transitions return one of
/// these before touching any state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{0} is not selectable right now")]
    NotSelectable(String),
    #[error("no active picking team")]
    NoActivePicker,
    #[error("action requires the {expected} phase, draft is in {found}")]
    WrongPhase { expected: Phase, found: Phase },
    #[error("ban phase is already complete")]
    BanPhaseComplete,
    #[error("match is already complete")]
    MatchComplete,
    #[error("already at the final match of the series")]
    FinalMatch,
    #[error("each team needs exactly {PLAYERS_PER_TEAM} players, got {0}")]
    RosterSize(usize),
    #[error("a series needs at least one match")]
    EmptySeries,
    #[error("a global ban requires a character id")]
    GlobalBanRequiresId,
}

/// The whole draft. There is exactly one value of this per draft at any time;
/// every transition builds a new value and leaves the old one untouched, so a
/// failed persist can never leave a half-applied turn behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    pub tournament: Option<String>,
    pub teams: PerTeam<TeamInfo>,
    pub series: SeriesConfig,
    /// 1-based match in progress. 0 is the legacy series-wide ban pre-phase;
    /// new drafts never enter it.
    pub current_match: usize,
    /// 0-based cursor into the active phase's turn sequence.
    pub current_turn: usize,
    pub phase: Phase,
    /// Legacy series-wide ban pool. Empty and confirmed for new drafts.
    pub global_bans: Vec<String>,
    pub global_ban_confirmed: bool,
    /// Which team opens each match; strictly alternates across the series.
    pub first_pick_by_match: Vec<TeamId>,
    /// Per match, per team, in confirmation order. Append-only.
    pub picks: Vec<PerTeam<Vec<String>>>,
    /// Per match, per team, in confirmation order. Append-only.
    pub bans: Vec<PerTeam<Vec<BanEntry>>>,
    pub updated_at: DateTime<Utc>,
}

impl DraftState {
    pub fn create(
        tournament: Option<String>,
        team_a: TeamInfo,
        team_b: TeamInfo,
        first_pick: TeamId,
        max_matches: usize,
    ) -> Result<DraftState, DraftError> {
        if max_matches == 0 {
            return Err(DraftError::EmptySeries);
        }
        for team in [&team_a, &team_b] {
            if team.players.len() != PLAYERS_PER_TEAM {
                return Err(DraftError::RosterSize(team.players.len()));
            }
        }
        let first_pick_by_match = (0..max_matches)
            .map(|i| if i % 2 == 0 { first_pick } else { first_pick.other() })
            .collect();
        Ok(DraftState {
            tournament,
            teams: PerTeam { a: team_a, b: team_b },
            series: SeriesConfig { max_matches },
            current_match: 1,
            current_turn: 0,
            phase: Phase::Ready,
            global_bans: Vec::new(),
            global_ban_confirmed: true,
            first_pick_by_match,
            picks: (0..max_matches).map(|_| PerTeam::default()).collect(),
            bans: (0..max_matches).map(|_| PerTeam::default()).collect(),
            updated_at: Utc::now(),
        })
    }

    /// Index into `picks`/`bans`/`first_pick_by_match` for the match in
    /// progress. `None` during the legacy pre-phase.
    fn match_idx(&self) -> Option<usize> {
        if self.current_match >= 1 {
            Some(self.current_match - 1)
        } else {
            None
        }
    }

    fn in_legacy_prephase(&self) -> bool {
        self.current_match == 0
    }

    pub fn first_picker(&self, match_number: usize) -> Option<TeamId> {
        match_number
            .checked_sub(1)
            .and_then(|i| self.first_pick_by_match.get(i))
            .copied()
    }

    /// Ban order for a match; empty if no first-picker is recorded for it.
    pub fn ban_sequence_for(&self, match_number: usize) -> Vec<TeamId> {
        match self.first_picker(match_number) {
            Some(first) => sequence::ban_sequence(first).to_vec(),
            None => Vec::new(),
        }
    }

    /// Pick order for a match; empty if no first-picker is recorded for it.
    pub fn pick_sequence_for(&self, match_number: usize) -> Vec<TeamId> {
        match self.first_picker(match_number) {
            Some(first) => sequence::pick_sequence(first).to_vec(),
            None => Vec::new(),
        }
    }

    /// Every character id excluded from selection at this point of the
    /// series: the legacy global pool, all confirmed bans up to and including
    /// the current match, and every pick from matches already played.
    /// The pool only ever grows as the series progresses.
    pub fn banned_pool(&self) -> HashSet<String> {
        let mut pool: HashSet<String> = self.global_bans.iter().cloned().collect();
        let Some(current) = self.match_idx() else {
            return pool;
        };
        for bans in self.bans.iter().take(current + 1) {
            for team in TeamId::BOTH {
                for entry in bans.get(team) {
                    if let BanEntry::Pokemon(id) = entry {
                        pool.insert(id.clone());
                    }
                }
            }
        }
        for picks in self.picks.iter().take(current) {
            for team in TeamId::BOTH {
                for id in picks.get(team) {
                    pool.insert(id.clone());
                }
            }
        }
        pool
    }

    /// Confirmed ban ids for the match in progress, both teams, skips
    /// excluded.
    pub fn current_match_bans(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(idx) = self.match_idx() {
            for team in TeamId::BOTH {
                out.extend(
                    self.bans[idx]
                        .get(team)
                        .iter()
                        .filter_map(|e| e.pokemon().map(str::to_string)),
                );
            }
        }
        out
    }

    pub fn current_match_bans_by_team(&self, team: TeamId) -> Vec<String> {
        match self.match_idx() {
            Some(idx) => self.bans[idx]
                .get(team)
                .iter()
                .filter_map(|e| e.pokemon().map(str::to_string))
                .collect(),
            None => Vec::new(),
        }
    }

    /// A team's three ban slots as the admin/spectator views show them:
    /// confirmed entries first (ban or skip), the rest still undecided.
    pub fn current_match_ban_entries(&self, team: TeamId) -> [BanSlot; BANS_PER_TEAM] {
        let mut slots = [const { BanSlot::Unset }; BANS_PER_TEAM];
        if let Some(idx) = self.match_idx() {
            for (slot, entry) in slots.iter_mut().zip(self.bans[idx].get(team)) {
                *slot = match entry {
                    BanEntry::Pokemon(id) => BanSlot::Banned(id.clone()),
                    BanEntry::Skip => BanSlot::Skipped,
                };
            }
        }
        slots
    }

    pub fn current_match_picks(&self, team: TeamId) -> &[String] {
        match self.match_idx() {
            Some(idx) => self.picks[idx].get(team),
            None => &[],
        }
    }

    /// The team whose turn it is, derived from the turn cursor and the match's
    /// sequences. Never stored, so it cannot drift from the cursor.
    pub fn current_picking_team(&self) -> Option<TeamId> {
        let seq = match self.phase {
            Phase::Ready => return None,
            Phase::Ban => self.ban_sequence_for(self.current_match),
            Phase::Pick => self.pick_sequence_for(self.current_match),
        };
        if seq.is_empty() {
            return None;
        }
        if self.current_turn >= seq.len() {
            // The phase should already have rolled over; report the last
            // turn's team rather than failing the read.
            warn!(
                turn = self.current_turn,
                phase = self.phase.as_str(),
                "turn cursor past end of sequence, clamping"
            );
            return seq.last().copied();
        }
        Some(seq[self.current_turn])
    }

    pub fn is_ban_phase_complete(&self) -> bool {
        if self.in_legacy_prephase() {
            return self.global_ban_confirmed;
        }
        match self.phase {
            Phase::Ready => false,
            Phase::Ban => self.current_turn >= BAN_TURNS,
            Phase::Pick => true,
        }
    }

    pub fn is_match_complete(&self) -> bool {
        self.phase == Phase::Pick && self.current_turn >= PICK_TURNS
    }

    pub fn is_draft_complete(&self) -> bool {
        self.current_match == self.series.max_matches && self.is_match_complete()
    }

    /// Whether confirming `id` would be legal right now. The single legality
    /// predicate both views and transitions consult.
    pub fn is_selectable(&self, id: &str) -> bool {
        if self.in_legacy_prephase() {
            return self.phase == Phase::Ban
                && !self.global_bans.iter().any(|b| b == id)
                && self.global_bans.len() < GLOBAL_BAN_CAP;
        }
        if self.global_bans.iter().any(|b| b == id) {
            return false;
        }
        match self.phase {
            Phase::Ready => false,
            Phase::Ban => {
                !self.is_ban_phase_complete() && !self.current_match_bans().iter().any(|b| b == id)
            }
            Phase::Pick => {
                if self.is_match_complete() || self.banned_pool().contains(id) {
                    return false;
                }
                if TeamId::BOTH
                    .iter()
                    .any(|t| self.current_match_picks(*t).iter().any(|p| p == id))
                {
                    return false;
                }
                match self.current_picking_team() {
                    Some(team) => self.current_match_picks(team).len() < PICKS_PER_TEAM,
                    None => false,
                }
            }
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Leave `ready` and open the first ban phase.
    pub fn start(&self) -> Result<DraftState, DraftError> {
        if self.phase != Phase::Ready {
            return Err(DraftError::WrongPhase {
                expected: Phase::Ready,
                found: self.phase,
            });
        }
        let mut next = self.clone();
        next.phase = Phase::Ban;
        next.current_turn = 0;
        next.touch();
        Ok(next)
    }

    /// Confirm the active ban turn. `None` is an explicit skip. Rolls the
    /// phase over to `pick` after the sixth ban.
    pub fn confirm_ban(&self, pokemon: Option<&str>) -> Result<DraftState, DraftError> {
        if self.in_legacy_prephase() {
            return self.confirm_global_ban(pokemon);
        }
        if self.phase != Phase::Ban {
            return Err(DraftError::WrongPhase {
                expected: Phase::Ban,
                found: self.phase,
            });
        }
        if self.is_ban_phase_complete() {
            return Err(DraftError::BanPhaseComplete);
        }
        let team = self.current_picking_team().ok_or(DraftError::NoActivePicker)?;
        if let Some(id) = pokemon {
            if !self.is_selectable(id) {
                return Err(DraftError::NotSelectable(id.to_string()));
            }
        }
        let mut next = self.clone();
        let idx = next.match_idx().ok_or(DraftError::NoActivePicker)?;
        let entry = match pokemon {
            Some(id) => BanEntry::Pokemon(id.to_string()),
            None => BanEntry::Skip,
        };
        next.bans[idx].get_mut(team).push(entry);
        next.current_turn += 1;
        if next.current_turn >= BAN_TURNS {
            next.current_turn = 0;
            next.phase = Phase::Pick;
        }
        next.touch();
        Ok(next)
    }

    /// Legacy pre-phase bans go to the shared pool; there is no turn cursor
    /// and no skip.
    fn confirm_global_ban(&self, pokemon: Option<&str>) -> Result<DraftState, DraftError> {
        let id = pokemon.ok_or(DraftError::GlobalBanRequiresId)?;
        if !self.is_selectable(id) {
            return Err(DraftError::NotSelectable(id.to_string()));
        }
        let mut next = self.clone();
        next.global_bans.push(id.to_string());
        next.touch();
        Ok(next)
    }

    /// Confirm the active pick turn. The phase value stays `pick`; match
    /// completion is derived from the cursor, never stored.
    pub fn confirm_pick(&self, pokemon: &str) -> Result<DraftState, DraftError> {
        if self.phase != Phase::Pick {
            return Err(DraftError::WrongPhase {
                expected: Phase::Pick,
                found: self.phase,
            });
        }
        if self.is_match_complete() {
            return Err(DraftError::MatchComplete);
        }
        let team = self.current_picking_team().ok_or(DraftError::NoActivePicker)?;
        if !self.is_selectable(pokemon) {
            return Err(DraftError::NotSelectable(pokemon.to_string()));
        }
        let mut next = self.clone();
        let idx = next.match_idx().ok_or(DraftError::NoActivePicker)?;
        let picks = next.picks[idx].get_mut(team);
        if !picks.iter().any(|p| p == pokemon) {
            picks.push(pokemon.to_string());
        }
        next.current_turn += 1;
        next.touch();
        Ok(next)
    }

    /// Move on to the next match's ban phase. Leaving the legacy pre-phase
    /// finalizes the global pool. Rejected at the final match; the caller sees
    /// the same failure shape as any other illegal action.
    pub fn advance_match(&self) -> Result<DraftState, DraftError> {
        let mut next = self.clone();
        if self.in_legacy_prephase() {
            next.global_ban_confirmed = true;
            next.current_match = 1;
        } else {
            if self.current_match >= self.series.max_matches {
                return Err(DraftError::FinalMatch);
            }
            next.current_match += 1;
        }
        next.current_turn = 0;
        next.phase = Phase::Ban;
        next.touch();
        Ok(next)
    }
}
