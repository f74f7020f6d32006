/// Password given to every fixture user
pub const TEST_PASSWORD: &str = "correct-horse-battery";
pub const TEST_APP_URL: &str = "http://localhost:8080";
pub const TEST_ADMIN_EMAIL: &str = "ops@example.com";
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test";
