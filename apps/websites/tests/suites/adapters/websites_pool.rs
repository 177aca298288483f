//! Postgres-only: set TEST_DATABASE_URL and run with --include-ignored.

repo_contract_tests!(
    crate::support::repos::pg_pool_repo,
    #[ignore = "requires TEST_DATABASE_URL"],
    #[serial_test::serial(postgres)],
);
