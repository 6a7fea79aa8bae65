use infrastructure::meter::{increment, set};

use crate::water::WaterSnapshot;

const ACCOUNT: &str = "account";

pub fn api_called(account: &str) {
    increment("apavital_api_calls", &[(ACCOUNT, account)]);
}

pub fn refresh_failed(account: &str) {
    increment("apavital_refresh_failures", &[(ACCOUNT, account)]);
}

pub fn snapshot_updated(account: &str, snapshot: &WaterSnapshot) {
    if snapshot.is_empty() {
        return;
    }

    set("apavital_meter_index", snapshot.index.0, &[(ACCOUNT, account)]);
    set(
        "apavital_leak_confidence",
        snapshot.leak.confidence.factor(),
        &[(ACCOUNT, account)],
    );
}
