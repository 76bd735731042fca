use thiserror::Error;

/// Trade validation errors, all raised before any network call.
#[derive(Error, Debug)]
pub enum TradeError {
    /// The player id does not exist in the catalog.
    #[error("Player {0} not found")]
    PlayerNotFound(i64),
    /// The league is not linked to the calling user.
    #[error("League {0} not found for current user")]
    LeagueNotFound(String),
    /// The user never recorded which franchise is theirs in this league.
    #[error("Your franchise in league {0} is not set")]
    FranchiseNotSet(String),
    /// Attempt to give a player the user's franchise does not roster.
    #[error("Player {player_id} is not on your roster in league {league}")]
    NotRostered {
        /// Remote player id.
        player_id: i64,
        /// Remote league id.
        league: String,
    },
    /// Attempt to receive a player the counterparty does not roster.
    #[error("Player {player_id} is not owned by franchise {franchise} in league {league}")]
    NotOwnedByCounterparty {
        /// Remote player id.
        player_id: i64,
        /// Counterparty franchise id.
        franchise: String,
        /// Remote league id.
        league: String,
    },
    /// The chosen counterparty does not exist in the league.
    #[error("Franchise {franchise} not found in league {league}")]
    CounterpartyNotFound {
        /// Counterparty franchise id.
        franchise: String,
        /// Remote league id.
        league: String,
    },
    /// A selected draft pick does not belong to the expected franchise.
    #[error("Draft pick {0} is not available for this offer")]
    PickNotAvailable(i32),
    /// A draft pick row is missing the provenance needed to encode it.
    #[error("Draft pick {0} cannot be encoded as a trade token")]
    UnencodablePick(i32),
    /// An offer must move at least one asset on each side.
    #[error("Offer for league {0} has an empty side")]
    EmptyOffer(String),
}
