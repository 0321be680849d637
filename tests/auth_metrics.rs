mod support;

use std::collections::HashSet;

use metrics_util::debugging::DebuggingRecorder;

use folio::application::auth::{ADMIN_LOGIN_TOTAL, ADMIN_SESSIONS_PURGED_TOTAL};
use support::*;

#[tokio::test]
async fn login_and_purge_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let app = test_app().await;

    app.auth
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("valid login");
    for _ in 0..4 {
        let _ = app.auth.login(ADMIN_EMAIL, "wrong password").await;
    }

    app.store.admins.expire_all_sessions();
    assert_eq!(app.auth.purge_expired().await.unwrap(), 1);

    let mut names = HashSet::new();
    let mut outcomes = HashSet::new();
    for (composite_key, _, _, _) in snapshotter.snapshot().into_vec() {
        let key = composite_key.key();
        names.insert(key.name().to_string());
        if key.name() == ADMIN_LOGIN_TOTAL {
            for label in key.labels() {
                if label.key() == "outcome" {
                    outcomes.insert(label.value().to_string());
                }
            }
        }
    }

    assert!(names.contains(ADMIN_LOGIN_TOTAL));
    assert!(names.contains(ADMIN_SESSIONS_PURGED_TOTAL));
    for outcome in ["success", "invalid", "throttled"] {
        assert!(outcomes.contains(outcome), "missing outcome: {outcome}");
    }
}
