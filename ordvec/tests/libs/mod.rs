use {assert_cmd::Command, assert_fs::TempDir, test_context::TestContext};

pub struct OrdvecContext {
    pub temp_dir: TempDir,
}

impl TestContext for OrdvecContext {
    fn setup() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(), // Will drop temp dir automatically.
        }
    }
}

pub fn ordvec() -> Command {
    Command::cargo_bin("ordvec").unwrap()
}
