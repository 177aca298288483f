//! The ORM adapter on Postgres, so its error translation is checked against
//! real SQLSTATEs and not only SQLite messages.

repo_contract_tests!(
    crate::support::repos::pg_orm_repo,
    #[ignore = "requires TEST_DATABASE_URL"],
    #[serial_test::serial(postgres)],
);
