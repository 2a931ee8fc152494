//! Tournament management and court assignments.

use crate::db::repository::FullRepository;
use crate::models::{
    Court, CourtId, NewTournament, Tournament, TournamentId, TournamentUpdate,
};

use super::{reference_error, ServiceError, ServiceResult};

/// Register a tournament. Name uniqueness is enforced by the repository.
pub async fn create_tournament(
    repo: &dyn FullRepository,
    new: NewTournament,
) -> ServiceResult<Tournament> {
    new.validate().map_err(ServiceError::Validation)?;
    Ok(repo.store_tournament(new).await?)
}

pub async fn get_tournament(
    repo: &dyn FullRepository,
    id: TournamentId,
) -> ServiceResult<Tournament> {
    Ok(repo.fetch_tournament(id).await?)
}

/// All tournaments, ordered by start date.
pub async fn list_tournaments(repo: &dyn FullRepository) -> ServiceResult<Vec<Tournament>> {
    Ok(repo.fetch_tournaments().await?)
}

/// Apply a partial update over the stored fields and persist the result.
pub async fn update_tournament(
    repo: &dyn FullRepository,
    id: TournamentId,
    update: TournamentUpdate,
) -> ServiceResult<Tournament> {
    let current = repo.fetch_tournament(id).await?;
    let merged = current.merged(&update);
    merged.validate().map_err(ServiceError::Validation)?;
    Ok(repo.update_tournament(id, merged).await?)
}

/// Remove a tournament and its court links.
pub async fn delete_tournament(repo: &dyn FullRepository, id: TournamentId) -> ServiceResult<()> {
    Ok(repo.delete_tournament(id).await?)
}

/// Assign a court to a tournament. Linking twice is a conflict.
pub async fn link_court(
    repo: &dyn FullRepository,
    tournament_id: TournamentId,
    court_id: CourtId,
) -> ServiceResult<()> {
    repo.fetch_tournament(tournament_id).await?;
    repo.fetch_court(court_id)
        .await
        .map_err(|e| reference_error(e, "court", court_id.value()))?;
    Ok(repo.link_court(tournament_id, court_id).await?)
}

/// Remove a court assignment. Not-found when the link does not exist.
pub async fn unlink_court(
    repo: &dyn FullRepository,
    tournament_id: TournamentId,
    court_id: CourtId,
) -> ServiceResult<()> {
    Ok(repo.unlink_court(tournament_id, court_id).await?)
}

/// Courts assigned to a tournament, ordered by name.
pub async fn list_tournament_courts(
    repo: &dyn FullRepository,
    tournament_id: TournamentId,
) -> ServiceResult<Vec<Court>> {
    repo.fetch_tournament(tournament_id).await?;
    Ok(repo.fetch_tournament_courts(tournament_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::{CourtKind, NewCourt};
    use crate::services::courts::OperatingWindow;
    use chrono::NaiveDate;

    fn copa(name: &str) -> NewTournament {
        NewTournament {
            name: name.to_string(),
            starts_on: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(),
            description: None,
        }
    }

    #[tokio::test]
    async fn linking_courts_round_trips() {
        let repo = LocalRepository::new();
        let tournament = create_tournament(&repo, copa("Copa Primavera")).await.unwrap();
        let court = crate::services::courts::create_court(
            &repo,
            NewCourt {
                name: "Futbol 7".to_string(),
                kind: CourtKind::Futbol7,
            },
            &OperatingWindow::default(),
        )
        .await
        .unwrap();

        link_court(&repo, tournament.id, court.id).await.unwrap();
        let courts = list_tournament_courts(&repo, tournament.id).await.unwrap();
        assert_eq!(courts.len(), 1);
        assert_eq!(courts[0].id, court.id);

        // Double-link is a conflict; unlink then relink is fine.
        let err = link_court(&repo, tournament.id, court.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Repository(e) if e.is_conflict()));
        unlink_court(&repo, tournament.id, court.id).await.unwrap();
        link_court(&repo, tournament.id, court.id).await.unwrap();
    }

    #[tokio::test]
    async fn linking_unknown_court_is_validation() {
        let repo = LocalRepository::new();
        let tournament = create_tournament(&repo, copa("Copa Invierno")).await.unwrap();
        let err = link_court(&repo, tournament.id, CourtId(404)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_validates_merged_dates() {
        let repo = LocalRepository::new();
        let tournament = create_tournament(&repo, copa("Copa Anual")).await.unwrap();

        let err = update_tournament(
            &repo,
            tournament.id,
            TournamentUpdate {
                ends_on: Some(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
