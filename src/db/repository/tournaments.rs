//! Tournament persistence operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Court, CourtId, NewTournament, Tournament, TournamentId};

#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Insert a tournament. Fails with a conflict error when the name is
    /// taken.
    async fn store_tournament(&self, new: NewTournament) -> RepositoryResult<Tournament>;

    async fn fetch_tournament(&self, id: TournamentId) -> RepositoryResult<Tournament>;

    /// All tournaments, ordered by start date.
    async fn fetch_tournaments(&self) -> RepositoryResult<Vec<Tournament>>;

    async fn update_tournament(
        &self,
        id: TournamentId,
        fields: NewTournament,
    ) -> RepositoryResult<Tournament>;

    /// Remove a tournament and its court links.
    async fn delete_tournament(&self, id: TournamentId) -> RepositoryResult<()>;

    /// Associate a court with a tournament. Not-found error when either side
    /// is unknown; conflict error when the link already exists.
    async fn link_court(
        &self,
        tournament_id: TournamentId,
        court_id: CourtId,
    ) -> RepositoryResult<()>;

    /// Remove a court association; not-found error when no such link exists.
    async fn unlink_court(
        &self,
        tournament_id: TournamentId,
        court_id: CourtId,
    ) -> RepositoryResult<()>;

    /// Courts linked to a tournament, ordered by name.
    async fn fetch_tournament_courts(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<Vec<Court>>;
}
