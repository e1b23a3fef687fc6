use crate::r#match::TeamSide;

/// Touches resolved by the possession step. The engine turns them into
/// statistics; possession-change match events come from the detector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BallEvent {
    Gained {
        player_id: u32,
        team: TeamSide,
    },
    PassCompleted {
        passer: u32,
        receiver: u32,
        team: TeamSide,
    },
    PassIntercepted {
        passer: u32,
        player_id: u32,
        team: TeamSide,
    },
    ShotStopped {
        shooter: u32,
        player_id: u32,
        team: TeamSide,
    },
    /// A control attempt failed and the ball bounced off the player.
    Deflected {
        player_id: u32,
        team: TeamSide,
    },
    /// The keeper went for the ball and was beaten.
    KeeperBeaten {
        player_id: u32,
    },
}

impl BallEvent {
    pub fn player_id(&self) -> u32 {
        match *self {
            BallEvent::Gained { player_id, .. }
            | BallEvent::PassIntercepted { player_id, .. }
            | BallEvent::ShotStopped { player_id, .. }
            | BallEvent::Deflected { player_id, .. }
            | BallEvent::KeeperBeaten { player_id } => player_id,
            BallEvent::PassCompleted { receiver, .. } => receiver,
        }
    }
}
