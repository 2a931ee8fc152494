//! Tests for db::factory - repository selection and creation.

mod support;

use std::str::FromStr;

use courtbook::db::factory::{RepositoryFactory, RepositoryType};
use courtbook::db::repository::SystemRepository;

#[test]
fn test_repository_type_from_str_postgres() {
    for name in ["postgres", "POSTGRES", "postgresql", "pg", "Pg"] {
        let rt = RepositoryType::from_str(name).unwrap();
        assert_eq!(rt, RepositoryType::Postgres, "alias {name}");
    }
}

#[test]
fn test_repository_type_from_str_local() {
    for name in ["local", "LOCAL", "memory", "in-memory", "In-Memory"] {
        let rt = RepositoryType::from_str(name).unwrap();
        assert_eq!(rt, RepositoryType::Local, "alias {name}");
    }
}

#[test]
fn test_repository_type_from_str_invalid() {
    let result = RepositoryType::from_str("sqlite");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || {
            let rt = RepositoryType::from_env();
            assert_eq!(rt, RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_with_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", Some("postgres://localhost/courtbook")),
        ],
        || {
            let rt = RepositoryType::from_env();
            assert_eq!(rt, RepositoryType::Postgres);
        },
    );
}

#[test]
fn test_repository_type_from_env_with_pg_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", Some("postgres://localhost/courtbook")),
        ],
        || {
            let rt = RepositoryType::from_env();
            assert_eq!(rt, RepositoryType::Postgres);
        },
    );
}

#[test]
fn test_repository_type_from_env_explicit_wins_over_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("memory")),
            ("DATABASE_URL", Some("postgres://localhost/courtbook")),
        ],
        || {
            let rt = RepositoryType::from_env();
            assert_eq!(rt, RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_explicit_postgres() {
    support::with_scoped_env(&[("REPOSITORY_TYPE", Some("postgres"))], || {
        let rt = RepositoryType::from_env();
        assert_eq!(rt, RepositoryType::Postgres);
    });
}

#[test]
fn test_repository_type_from_env_invalid_defaults_to_local() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("mongo")),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || {
            let rt = RepositoryType::from_env();
            assert_eq!(rt, RepositoryType::Local);
        },
    );
}

#[tokio::test]
async fn test_create_local_repository_serves_queries() {
    let repo = RepositoryFactory::create_local();
    assert!(repo.health_check().await.is_ok());
}

#[tokio::test]
async fn test_create_local_via_factory() {
    let result = RepositoryFactory::create(RepositoryType::Local, None).await;
    assert!(result.is_ok());
}

#[cfg(feature = "postgres-repo")]
#[tokio::test]
async fn test_create_postgres_without_config_fails() {
    let result = RepositoryFactory::create(RepositoryType::Postgres, None).await;
    assert!(result.is_err());
    assert!(result
        .err()
        .unwrap()
        .to_string()
        .contains("requires PostgresConfig"));
}

#[cfg(not(feature = "postgres-repo"))]
#[tokio::test]
async fn test_create_postgres_without_feature_fails() {
    let result = RepositoryFactory::create(RepositoryType::Postgres, None).await;
    assert!(result.is_err());
    let err = result.err().unwrap();
    assert!(err.to_string().contains("feature not enabled"));
}

#[test]
fn test_repository_type_is_copy_and_eq() {
    let rt1 = RepositoryType::Local;
    let rt2 = rt1;
    assert_eq!(rt1, rt2);
    assert_ne!(RepositoryType::Local, RepositoryType::Postgres);
    assert!(format!("{:?}", rt2).contains("Local"));
}
