//! End-to-end runs through the controller with real files on disk

use herald::RunOptions;
use herald_dispatch::RunOutcome;

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new(campaign: &str, recipients: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("campaign.json"), campaign).expect("write campaign");
        std::fs::write(dir.path().join("recipients.json"), recipients).expect("write recipients");
        Self { dir }
    }

    fn options(&self, dry_run: bool) -> RunOptions {
        RunOptions {
            campaign: self.dir.path().join("campaign.json"),
            recipients: self.dir.path().join("recipients.json"),
            sender: "operator".to_string(),
            data_dir: self.dir.path().join("data"),
            dry_run,
        }
    }

    fn ledger_json(&self, name: &str) -> serde_json::Value {
        let text = std::fs::read_to_string(self.dir.path().join("data").join(name))
            .expect("ledger file exists");
        serde_json::from_str(&text).expect("ledger is valid JSON")
    }

    fn ledger_exists(&self, name: &str) -> bool {
        self.dir.path().join("data").join(name).exists()
    }
}

const RECIPIENTS: &str = r#"[
    { "id": "r1", "display_name": "Ada", "follower_count": 10, "bio_tags": ["tech"] },
    { "id": "r2", "display_name": "Grace", "follower_count": 20, "bio_tags": ["tech"] },
    { "id": "r3", "display_name": "Edsger", "follower_count": 5, "bio_tags": ["math"] }
]"#;

#[tokio::test]
async fn live_run_persists_a_ledger_and_resumes_to_nothing() {
    let fixture = Fixture::new(
        r#"{ "message": "hello", "campaign_id": "launch" }"#,
        RECIPIENTS,
    );

    let summary = herald::run(fixture.options(false)).await.expect("first run");
    assert_eq!(summary.sent, 3);
    assert_eq!(summary.outcome, RunOutcome::Completed);

    let ledger = fixture.ledger_json("operator.messageHistory.json");
    assert_eq!(ledger["events"].as_array().expect("events array").len(), 3);
    assert!(ledger["campaigns"]["launch"]["r1"].is_string());

    // Influence order: r2 (20) before r1 (10) before r3 (5)
    assert_eq!(ledger["events"][0]["recipient"], "r2");
    assert_eq!(ledger["events"][1]["recipient"], "r1");
    assert_eq!(ledger["events"][2]["recipient"], "r3");

    // An identical rerun has nothing left to send
    let summary = herald::run(fixture.options(false)).await.expect("rerun");
    assert_eq!(summary.outcome, RunOutcome::NothingToDo);
    assert_eq!(summary.sent, 0);
    assert_eq!(summary.already_contacted, 3);
}

#[tokio::test]
async fn send_limit_caps_the_run_and_resume_finishes_it() {
    let fixture = Fixture::new(
        r#"{ "message": "hello", "campaign_id": "capped", "count": 2 }"#,
        RECIPIENTS,
    );

    let summary = herald::run(fixture.options(false)).await.expect("first run");
    assert_eq!(summary.sent, 2);

    let summary = herald::run(fixture.options(false)).await.expect("resume");
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.already_contacted, 2);

    let ledger = fixture.ledger_json("operator.messageHistory.json");
    assert_eq!(ledger["events"].as_array().expect("events array").len(), 3);
}

#[tokio::test]
async fn dry_run_writes_only_the_dry_run_ledger() {
    let fixture = Fixture::new(r#"{ "message": "hello" }"#, RECIPIENTS);

    let summary = herald::run(fixture.options(true)).await.expect("dry run");
    assert_eq!(summary.sent, 3);

    assert!(fixture.ledger_exists("operator.dryrun.messageHistory.json"));
    assert!(!fixture.ledger_exists("operator.messageHistory.json"));

    // A live run afterwards is unaffected by dry-run history
    let summary = herald::run(fixture.options(false)).await.expect("live run");
    assert_eq!(summary.sent, 3);
    assert!(fixture.ledger_exists("operator.messageHistory.json"));
}

#[tokio::test]
async fn tag_filter_restricts_the_live_run() {
    let fixture = Fixture::new(
        r#"{ "message": "hello", "campaign_id": "tagged", "filter": { "tags": ["TECH"] } }"#,
        RECIPIENTS,
    );

    let summary = herald::run(fixture.options(false)).await.expect("run");
    assert_eq!(summary.sent, 2);

    let ledger = fixture.ledger_json("operator.messageHistory.json");
    assert!(ledger["campaigns"]["tagged"]["r3"].is_null());
}

#[tokio::test]
async fn invalid_campaign_aborts_with_no_side_effects() {
    let fixture = Fixture::new(r#"{ "campaign_id": "no-message" }"#, RECIPIENTS);

    let err = herald::run(fixture.options(false)).await.expect_err("must fail");
    assert!(err.to_string().contains("No message specified"));

    assert!(!fixture.ledger_exists("operator.messageHistory.json"));
}
