use crate::r#match::engine::physics::clamp_to_field;
use crate::r#match::engine::physics::constants::field;
use crate::r#match::{
    AgentTuning, Ball, FormationLayout, MatchPlayer, MatchRng, MatchSquad, RestartProtection,
    TeamSide,
};
use log::debug;
use nalgebra::Vector3;
use std::f32::consts::PI;

const SET_PIECE_CLEARANCE: f32 = field::CENTER_CIRCLE_RADIUS;
const THROW_IN_CLEARANCE: f32 = 5.0;

/// Dead-ball situations and who restarts play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Restart {
    /// Ball dropped near the centre spot; nobody is handed possession.
    Kickoff,
    GoalKick { team: TeamSide },
    Corner { team: TeamSide, position: Vector3<f32> },
    ThrowIn { team: TeamSide, position: Vector3<f32> },
    FreeKick { team: TeamSide, position: Vector3<f32> },
}

pub struct MatchField {
    pub ball: Ball,
    pub players: Vec<MatchPlayer>,
    /// +1.0 while the home team attacks towards +x; flips at half time.
    pub home_direction: f32,

    pub home_team_id: u32,
    pub home_team_name: String,
    pub away_team_id: u32,
    pub away_team_name: String,
}

impl MatchField {
    pub fn new(home_squad: &MatchSquad, away_squad: &MatchSquad) -> Self {
        let players = setup_player_on_field(home_squad, TeamSide::Home)
            .into_iter()
            .chain(setup_player_on_field(away_squad, TeamSide::Away))
            .collect();

        let mut field = MatchField {
            ball: Ball::default(),
            players,
            home_direction: 1.0,
            home_team_id: home_squad.team_id,
            home_team_name: home_squad.team_name.clone(),
            away_team_id: away_squad.team_id,
            away_team_name: away_squad.team_name.clone(),
        };

        field.reset_players_positions();
        field
    }

    #[inline]
    pub fn direction(&self, team: TeamSide) -> f32 {
        team_direction(team, self.home_direction)
    }

    pub fn to_world(&self, team: TeamSide, slot: &Vector3<f32>) -> Vector3<f32> {
        let direction = self.direction(team);
        Vector3::new(slot.x * direction, slot.y * direction, 0.0)
    }

    pub fn get_player(&self, id: u32) -> Option<&MatchPlayer> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: u32) -> Option<&mut MatchPlayer> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Every active player back to the kickoff formation.
    pub fn reset_players_positions(&mut self) {
        let home_direction = self.home_direction;

        self.players.iter_mut().filter(|p| p.is_active).for_each(|p| {
            let direction = team_direction(p.team, home_direction);

            let slot = FormationLayout::kickoff_slot(&p.slot);
            let position = Vector3::new(slot.x * direction, slot.y * direction, 0.0);
            let facing = if direction > 0.0 { 0.0 } else { PI };

            p.state.reset_to(position, facing);
        });
    }

    /// Teams change ends.
    pub fn swap_squads(&mut self) {
        self.home_direction = -self.home_direction;
    }

    /// Kickoff: both teams in formation, the ball dropped at a random point
    /// within `jitter_radius` of the centre spot.
    pub fn restart_kickoff(&mut self, rng: &mut MatchRng, jitter_radius: f32) {
        self.reset_players_positions();

        let (x, y) = rng.disc(jitter_radius);
        self.ball = Ball::at(Vector3::new(x, y, 0.0));

        debug!("Kickoff, ball placed at ({:.2}, {:.2})", x, y);
    }

    /// Places the ball for a restart and hands it to a taker of the awarded
    /// team. Opponents are moved out of the clearance radius and the taker is
    /// protected from challenges for a short time.
    pub fn restart(&mut self, restart: Restart, tuning: &AgentTuning, rng: &mut MatchRng) {
        let (team, spot, clearance) = match restart {
            Restart::Kickoff => {
                self.restart_kickoff(rng, tuning.restart_jitter_radius);
                return;
            }
            Restart::GoalKick { team } => {
                let goal_x = -self.direction(team) * field::HALF_LENGTH;
                let spot = Vector3::new(
                    goal_x + self.direction(team) * field::GOAL_AREA_DEPTH,
                    0.0,
                    0.0,
                );

                (team, spot, SET_PIECE_CLEARANCE)
            }
            Restart::Corner { team, position } => {
                let spot = Vector3::new(
                    position.x.signum() * field::HALF_LENGTH,
                    position.y.signum() * field::HALF_WIDTH,
                    0.0,
                );

                (team, spot, SET_PIECE_CLEARANCE)
            }
            Restart::ThrowIn { team, position } => {
                let spot = Vector3::new(
                    position.x.clamp(-field::HALF_LENGTH, field::HALF_LENGTH),
                    position.y.signum() * field::HALF_WIDTH,
                    0.0,
                );

                (team, spot, THROW_IN_CLEARANCE)
            }
            Restart::FreeKick { team, position } => {
                (team, clamp_to_field(Vector3::new(position.x, position.y, 0.0)), SET_PIECE_CLEARANCE)
            }
        };

        let Some(taker_id) = self.select_taker(team, &restart, &spot) else {
            // no one left to take it
            self.ball.place(spot);
            return;
        };

        let facing = if self.direction(team) > 0.0 { 0.0 } else { PI };

        if let Some(taker) = self.get_player_mut(taker_id) {
            taker.state.reset_to(spot, facing);
        }

        for player in self
            .players
            .iter_mut()
            .filter(|p| p.is_active && p.team != team)
        {
            let offset = player.state.position - spot;
            let distance = offset.norm();

            if distance < clearance {
                let direction = if distance > 1e-3 {
                    offset / distance
                } else {
                    Vector3::new(-team_direction(team, self.home_direction), 0.0, 0.0)
                };

                player.state.position = clear_of(&spot, &direction, clearance);
                player.state.velocity = Vector3::zeros();
            }
        }

        self.ball.place(spot);
        self.ball.gain(taker_id, team);
        self.ball.protection = Some(RestartProtection {
            taker: taker_id,
            remaining: tuning.restart_protection_seconds,
        });

        debug!("Restart {:?}, taker {}", restart, taker_id);
    }

    fn select_taker(&self, team: TeamSide, restart: &Restart, spot: &Vector3<f32>) -> Option<u32> {
        let candidates = || {
            self.players
                .iter()
                .filter(move |p| p.is_active && p.team == team)
        };

        if let Restart::GoalKick { .. } = restart {
            if let Some(keeper) = candidates().find(|p| p.role.is_goalkeeper()) {
                return Some(keeper.id);
            }
        }

        // outfield players first, nearest to the spot
        candidates()
            .min_by(|a, b| {
                (a.role.is_goalkeeper(), (a.state.position - spot).norm(), a.id)
                    .partial_cmp(&(b.role.is_goalkeeper(), (b.state.position - spot).norm(), b.id))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.id)
    }

    /// Sends a player off; a ball at his feet becomes loose.
    pub fn send_off(&mut self, player_id: u32) {
        if self.ball.is_owned_by(player_id) {
            self.ball.release();
        }

        if let Some(player) = self.get_player_mut(player_id) {
            player.send_off();
        }
    }

    pub fn active_players(&self, team: TeamSide) -> usize {
        self.players
            .iter()
            .filter(|p| p.is_active && p.team == team)
            .count()
    }
}

#[inline]
fn team_direction(team: TeamSide, home_direction: f32) -> f32 {
    match team {
        TeamSide::Home => home_direction,
        TeamSide::Away => -home_direction,
    }
}

fn setup_player_on_field(squad: &MatchSquad, team: TeamSide) -> Vec<MatchPlayer> {
    let slots = FormationLayout::slots(&squad.main_squad);

    squad
        .main_squad
        .iter()
        .zip(slots)
        .map(|(player, slot)| MatchPlayer::from_squad(player, team, slot))
        .collect()
}

/// Moves `clearance` away from `spot` along `direction`. Near a corner flag
/// the clamped position slides along the touchline into the pitch instead.
fn clear_of(spot: &Vector3<f32>, direction: &Vector3<f32>, clearance: f32) -> Vector3<f32> {
    let cleared = clamp_to_field(spot + direction * clearance);

    if (cleared - spot).norm() >= clearance {
        return cleared;
    }

    let dy = cleared.y - spot.y;
    let inward = if spot.x > 0.0 { -1.0 } else { 1.0 };
    let dx = (clearance * clearance - dy * dy).max(0.0).sqrt();

    clamp_to_field(Vector3::new(spot.x + inward * dx, cleared.y, cleared.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::engine::physics::is_inside_field;
    use crate::r#match::{SquadGenerator, SquadProfile};

    fn field() -> MatchField {
        let home = SquadGenerator::new(1).generate(1, "Home", &SquadProfile::uniform(70.0));
        let away = SquadGenerator::new(2).generate(2, "Away", &SquadProfile::uniform(70.0));

        MatchField::new(&home, &away)
    }

    #[test]
    fn test_kickoff_formation_is_point_symmetric() {
        let field = field();

        let home: Vec<_> = field.players.iter().filter(|p| p.team == TeamSide::Home).collect();
        let away: Vec<_> = field.players.iter().filter(|p| p.team == TeamSide::Away).collect();

        assert_eq!(home.len(), 11);
        for (h, a) in home.iter().zip(away.iter()) {
            assert!((h.position() + a.position()).norm() < 1e-4);
            assert!(h.position().x < 0.0);
            assert!(h.position().norm() >= field::CENTER_CIRCLE_RADIUS);
        }
    }

    #[test]
    fn test_swap_squads_mirrors_kickoff() {
        let mut field = field();
        let before = field.players[0].position();

        field.swap_squads();
        field.reset_players_positions();

        assert_eq!(field.players[0].position(), -before);
    }

    #[test]
    fn test_kickoff_ball_within_jitter_and_loose() {
        let mut field = field();
        let mut rng = MatchRng::seed_from(5);

        for _ in 0..100 {
            field.restart_kickoff(&mut rng, 2.0);

            assert!(field.ball.position().norm() <= 2.0 + 1e-5);
            assert!(!field.ball.is_owned());
        }
    }

    #[test]
    fn test_goal_kick_goes_to_keeper() {
        let mut field = field();
        let mut rng = MatchRng::seed_from(5);
        let tuning = AgentTuning::default();

        field.restart(Restart::GoalKick { team: TeamSide::Away }, &tuning, &mut rng);

        let owner = field.ball.current_owner.and_then(|id| field.get_player(id)).unwrap();
        assert!(owner.role.is_goalkeeper());
        assert_eq!(owner.team, TeamSide::Away);
        assert_eq!(field.ball.position().x, field::HALF_LENGTH - field::GOAL_AREA_DEPTH);
        assert!(field.ball.is_protected());
    }

    #[test]
    fn test_throw_in_clears_opponents() {
        let mut field = field();
        let mut rng = MatchRng::seed_from(5);
        let tuning = AgentTuning::default();

        field.players[15].state.position = Vector3::new(10.0, 33.0, 0.0);

        field.restart(
            Restart::ThrowIn {
                team: TeamSide::Home,
                position: Vector3::new(10.0, 34.5, 0.0),
            },
            &tuning,
            &mut rng,
        );

        let spot = Vector3::new(10.0, field::HALF_WIDTH, 0.0);
        assert_eq!(field.ball.position(), spot);
        assert_eq!(field.ball.owner_team, Some(TeamSide::Home));

        for opponent in field.players.iter().filter(|p| p.team == TeamSide::Away) {
            assert!((opponent.position() - spot).norm() >= THROW_IN_CLEARANCE - 1e-3);
        }
    }

    #[test]
    fn test_corner_clears_opponents_near_the_flag() {
        let mut field = field();
        let mut rng = MatchRng::seed_from(5);
        let tuning = AgentTuning::default();

        let crowd = [
            Vector3::new(52.0, 33.5, 0.0),
            Vector3::new(50.0, 34.0, 0.0),
            Vector3::new(52.5, 30.0, 0.0),
            Vector3::new(52.5, 34.0, 0.0),
        ];
        for (player, position) in field
            .players
            .iter_mut()
            .filter(|p| p.team == TeamSide::Away)
            .zip(crowd)
        {
            player.state.position = position;
        }

        field.restart(
            Restart::Corner {
                team: TeamSide::Home,
                position: Vector3::new(53.0, 34.5, 0.0),
            },
            &tuning,
            &mut rng,
        );

        let spot = Vector3::new(field::HALF_LENGTH, field::HALF_WIDTH, 0.0);
        assert_eq!(field.ball.position(), spot);

        for opponent in field.players.iter().filter(|p| p.team == TeamSide::Away) {
            let position = opponent.position();

            assert!((position - spot).norm() >= SET_PIECE_CLEARANCE - 1e-3, "{position:?}");
            assert!(is_inside_field(&position));
        }
    }

    #[test]
    fn test_throw_in_by_the_flag_slides_opponents_along_the_line() {
        let mut field = field();
        let mut rng = MatchRng::seed_from(5);
        let tuning = AgentTuning::default();

        let crowd = [Vector3::new(52.5, 33.8, 0.0), Vector3::new(52.5, 34.0, 0.0)];
        for (player, position) in field
            .players
            .iter_mut()
            .filter(|p| p.team == TeamSide::Away)
            .zip(crowd)
        {
            player.state.position = position;
        }

        field.restart(
            Restart::ThrowIn {
                team: TeamSide::Home,
                position: Vector3::new(51.5, 34.5, 0.0),
            },
            &tuning,
            &mut rng,
        );

        let spot = Vector3::new(51.5, field::HALF_WIDTH, 0.0);
        assert_eq!(field.ball.position(), spot);

        for opponent in field.players.iter().filter(|p| p.team == TeamSide::Away) {
            let position = opponent.position();

            assert!((position - spot).norm() >= THROW_IN_CLEARANCE - 1e-3, "{position:?}");
            assert!(is_inside_field(&position));
        }
    }

    #[test]
    fn test_send_off_releases_ball() {
        let mut field = field();
        let id = field.players[5].id;
        field.ball.gain(id, TeamSide::Home);

        field.send_off(id);

        assert!(!field.ball.is_owned());
        assert_eq!(field.active_players(TeamSide::Home), 10);
    }
}
