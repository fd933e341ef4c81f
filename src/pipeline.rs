//! Command orchestration: fetch feeds into the cache, then build analyses
//! and reports from cached JSON only.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::analysis::win_prob;
use crate::analysis::{
    explosive, middle_eight, penalties, ppa, red_zone, school_name, situational, GamePlays,
};
use crate::cache::{CacheKind, CacheStore};
use crate::cfbd::types::{CfbdPlay, CfbdWpEntry};
use crate::cfbd::CfbdRest;
use crate::config::Config;
use crate::espn::types::{Drives, Summary};
use crate::espn::EspnRest;
use crate::model::{GameInfo, Play};
use crate::report::html::{self, GamePage, SeasonPage};

pub struct Pipeline {
    config: Config,
    cache: CacheStore,
}

impl Pipeline {
    pub fn new(config: Config, data_dir: &Path) -> Self {
        Self {
            config,
            cache: CacheStore::new(data_dir),
        }
    }

    /// Fetch every feed for one game. ESPN sections degrade independently;
    /// CFBD is skipped with a warning when no key is configured.
    pub async fn fetch(
        &self,
        game_id: u64,
        year: Option<u16>,
        week: Option<u8>,
        force: bool,
    ) -> Result<()> {
        let espn = EspnRest::new(
            &self.config.espn.summary_url,
            &self.config.espn.core_api_url,
            self.config.espn.request_timeout_ms,
        )?;

        let summary = if force || !self.cache.exists(game_id, CacheKind::Summary) {
            let summary = espn.get_summary(game_id).await?;
            self.cache.save(game_id, CacheKind::Summary, &summary)?;
            info!(game_id, "cached ESPN summary");
            summary
        } else {
            info!(game_id, "ESPN summary already cached");
            self.cache.load(game_id, CacheKind::Summary)?
        };

        if force || !self.cache.exists(game_id, CacheKind::EspnPlays) {
            match espn.get_plays(game_id).await {
                Ok(plays) => {
                    self.cache.save(game_id, CacheKind::EspnPlays, &plays)?;
                    info!(game_id, count = plays.len(), "cached ESPN plays");
                }
                Err(err) => warn!(game_id, %err, "ESPN plays fetch failed; continuing"),
            }
        }

        if force || !self.cache.exists(game_id, CacheKind::Drives) {
            match espn.get_drives(game_id).await {
                Ok(drives) => {
                    self.cache.save(game_id, CacheKind::Drives, &drives)?;
                    info!(game_id, "cached ESPN drives");
                }
                Err(err) => warn!(game_id, %err, "ESPN drives fetch failed; continuing"),
            }
        }

        let need_plays = force || !self.cache.exists(game_id, CacheKind::CfbdPlays);
        let need_wp = force || !self.cache.exists(game_id, CacheKind::CfbdWp);
        if need_plays || need_wp {
            let key = match Config::cfbd_api_key() {
                Ok(key) => key,
                Err(err) => {
                    warn!(%err, "no CFBD key available; skipping CFBD feeds");
                    return Ok(());
                }
            };
            let cfbd = CfbdRest::new(
                key,
                &self.config.cfbd.base_url,
                self.config.cfbd.request_timeout_ms,
            )?;

            if need_plays {
                let year = year.or_else(|| {
                    summary
                        .header
                        .as_ref()
                        .and_then(|h| h.season.as_ref())
                        .map(|s| s.year)
                });
                let mut week = week.or_else(|| summary.header.as_ref().and_then(|h| h.week));
                if week.is_none() {
                    if let Some(year) = year {
                        week = self.resolve_week(&cfbd, game_id, year, &summary).await;
                    }
                }
                match (year, week) {
                    (Some(year), Some(week)) => match cfbd.get_plays(game_id, year, week).await {
                        Ok(plays) if plays.is_empty() => {
                            warn!(game_id, year, week, "CFBD returned no plays for this game")
                        }
                        Ok(plays) => {
                            self.cache.save(game_id, CacheKind::CfbdPlays, &plays)?;
                            info!(game_id, count = plays.len(), "cached CFBD plays");
                        }
                        Err(err) => warn!(game_id, %err, "CFBD plays fetch failed; continuing"),
                    },
                    _ => warn!(
                        game_id,
                        "season year/week unknown; pass --year and --week to fetch CFBD plays"
                    ),
                }
            }

            if need_wp {
                match cfbd.get_win_probability(game_id).await {
                    Ok(entries) if entries.is_empty() => {
                        warn!(game_id, "CFBD has no win-probability data for this game")
                    }
                    Ok(entries) => {
                        self.cache.save(game_id, CacheKind::CfbdWp, &entries)?;
                        info!(game_id, count = entries.len(), "cached CFBD win probability");
                    }
                    Err(err) => warn!(game_id, %err, "CFBD win-probability fetch failed; continuing"),
                }
            }
        }

        Ok(())
    }

    /// Resolve the week for a game the summary does not date, by searching
    /// CFBD's games listing for the home school. CFBD and ESPN share game
    /// ids for recent seasons, so a direct id match settles it.
    async fn resolve_week(
        &self,
        cfbd: &CfbdRest,
        game_id: u64,
        year: u16,
        summary: &Summary,
    ) -> Option<u8> {
        let school = school_name(&summary.game_info(game_id).home_team);
        if school.is_empty() {
            return None;
        }
        match cfbd.get_games(year, None, Some(&school)).await {
            Ok(games) => {
                let week = games.iter().find(|g| g.id == game_id).and_then(|g| g.week);
                if week.is_none() {
                    warn!(game_id, year, %school, "game not found in CFBD games listing");
                }
                week
            }
            Err(err) => {
                warn!(game_id, %err, "CFBD games lookup failed");
                None
            }
        }
    }

    fn load_summary(&self, game_id: u64) -> Result<Summary> {
        if !self.cache.exists(game_id, CacheKind::Summary) {
            bail!("no cached summary for game {game_id}; run fetch first");
        }
        self.cache.load(game_id, CacheKind::Summary)
    }

    fn load_cfbd_plays(&self, game_id: u64) -> Result<Vec<Play>> {
        let raw: Vec<CfbdPlay> = self.cache.load(game_id, CacheKind::CfbdPlays)?;
        Ok(raw
            .iter()
            .enumerate()
            .map(|(i, p)| crate::cfbd::types::normalize_play(p, i))
            .collect())
    }

    /// Game plays with CFBD preferred for its PPA values, ESPN drives as the
    /// fallback when CFBD was never cached.
    fn load_game(&self, game_id: u64) -> Result<(GameInfo, Vec<Play>, Summary)> {
        let summary = self.load_summary(game_id)?;
        let info = summary.game_info(game_id);
        let plays = if self.cache.exists(game_id, CacheKind::CfbdPlays) {
            self.load_cfbd_plays(game_id)?
        } else {
            warn!(game_id, "no cached CFBD plays; using ESPN drives without PPA");
            let mut plays = summary.plays_from_drives(&info);
            if plays.is_empty() && self.cache.exists(game_id, CacheKind::Drives) {
                let drives: Drives = self.cache.load(game_id, CacheKind::Drives)?;
                plays = drives.normalized_plays(&info);
            }
            plays
        };
        if plays.is_empty() {
            bail!("no plays available for game {game_id}");
        }
        Ok((info, plays, summary))
    }

    fn write_report(&self, path: &Path, html: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
        Ok(())
    }

    pub fn report(&self, game_id: u64, out: Option<PathBuf>) -> Result<()> {
        let (info, plays, summary) = self.load_game(game_id)?;
        let analysis = &self.config.analysis;

        let wp = win_prob::analyze(
            &summary.winprobability,
            &plays,
            analysis.inflection_threshold_pct,
            analysis.explosive_yards,
        );

        let game = GamePlays {
            info: info.clone(),
            plays,
        };
        let games = std::slice::from_ref(&game);
        let home_explosive =
            explosive::analyze(games, &info.home_team, analysis.explosive_yards, 1);
        let away_explosive =
            explosive::analyze(games, &info.away_team, analysis.explosive_yards, 1);
        let home_penalties = penalties::analyze(games, &info.home_team);
        let away_penalties = penalties::analyze(games, &info.away_team);

        let html = html::render_game(
            &GamePage {
                info: &info,
                plays: &game.plays,
                win_prob: &wp,
                home_explosive: &home_explosive,
                away_explosive: &away_explosive,
                home_penalties: &home_penalties,
                away_penalties: &away_penalties,
            },
            &self.config.report,
        );
        let out = out.unwrap_or_else(|| PathBuf::from(format!("game_{game_id}_review.html")));
        self.write_report(&out, &html)
    }

    pub fn compare(&self, game_id: u64, out: Option<PathBuf>) -> Result<()> {
        let summary = self.load_summary(game_id)?;
        let info = summary.game_info(game_id);
        if summary.winprobability.is_empty() {
            bail!("cached summary for game {game_id} has no win-probability data");
        }
        if !self.cache.exists(game_id, CacheKind::CfbdWp) {
            bail!("no cached CFBD win probability for game {game_id}; run fetch first");
        }

        let espn_wp: Vec<f64> = summary
            .winprobability
            .iter()
            .map(|e| e.home_win_percentage * 100.0)
            .collect();
        let entries: Vec<CfbdWpEntry> = self.cache.load(game_id, CacheKind::CfbdWp)?;
        let cfbd_wp: Vec<f64> = entries.iter().filter_map(|e| e.home_wp_pct()).collect();
        if cfbd_wp.is_empty() {
            bail!("cached CFBD win probability for game {game_id} has no usable values");
        }

        let aligned = win_prob::align(&espn_wp, &cfbd_wp);
        let html = html::render_compare(
            &info,
            &aligned,
            espn_wp.len(),
            cfbd_wp.len(),
            &self.config.report,
        );
        let out = out.unwrap_or_else(|| PathBuf::from(format!("game_{game_id}_compare.html")));
        self.write_report(&out, &html)
    }

    pub fn season(&self, team: &str, out: Option<PathBuf>) -> Result<()> {
        let ids = self.cache.games()?;
        if ids.is_empty() {
            bail!("no cached games under {}; run fetch first", self.cache.root().display());
        }

        let mut games: Vec<GamePlays> = Vec::new();
        for game_id in ids {
            match self.load_game(game_id) {
                Ok((info, plays, _)) => games.push(GamePlays { info, plays }),
                Err(err) => warn!(game_id, %err, "skipping cached game"),
            }
        }
        let games: Vec<GamePlays> = games
            .into_iter()
            .filter(|g| {
                crate::analysis::team_matches(&g.info.home_team, team)
                    || crate::analysis::team_matches(&g.info.away_team, team)
            })
            .collect();
        if games.is_empty() {
            bail!("no cached games involve {team}");
        }
        info!(team, games = games.len(), "building season review");

        let analysis = &self.config.analysis;
        let all_plays: Vec<&Play> = games.iter().flat_map(|g| g.plays.iter()).collect();

        let situational = situational::analyze(&all_plays, team);
        let explosive = explosive::analyze(
            &games,
            team,
            analysis.explosive_yards,
            analysis.recent_games,
        );
        let penalties = penalties::analyze(&games, team);
        let red_zone = red_zone::analyze(
            &all_plays,
            team,
            analysis.red_zone_yards,
            analysis.green_zone_yards,
            analysis.explosive_yards,
        );
        let middle_eight = middle_eight::analyze(
            &games,
            team,
            analysis.middle_eight_secs,
            analysis.recent_games,
        );
        let ppa = ppa::analyze(&all_plays, team, analysis.explosive_yards);

        let html = html::render_season(
            &SeasonPage {
                team,
                games: games.len(),
                recent_games: analysis.recent_games,
                situational: &situational,
                explosive: &explosive,
                penalties: &penalties,
                red_zone: &red_zone,
                middle_eight: &middle_eight,
                ppa: &ppa,
            },
            &self.config.report,
        );
        let out = out.unwrap_or_else(|| {
            let slug = team.to_lowercase().replace(' ', "_");
            PathBuf::from(format!("{slug}_season_review.html"))
        });
        self.write_report(&out, &html)
    }

    pub async fn check(&self) -> Result<()> {
        let key = Config::cfbd_api_key()?;
        let cfbd = CfbdRest::new(
            key,
            &self.config.cfbd.base_url,
            self.config.cfbd.request_timeout_ms,
        )?;
        cfbd.preflight_auth_check().await?;
        info!("CFBD key accepted");
        Ok(())
    }
}
