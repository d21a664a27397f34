//! WalletSession: connect, disconnect, restore and supersession.

mod common;

use common::*;
use fractional_wallet::{AccountSource, Capability, MemoryFlag, SessionStatus};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Notify;

#[tokio::test]
async fn connect_uses_real_provider() {
    let h = Harness::new(strict());
    let wallet = h.inject("suiWallet", FakeProvider::full());

    let state = h.session.connect().await;

    assert_eq!(state.account.as_ref().map(|a| a.address()), Some(REAL_ADDRESS));
    assert!(state.account.as_ref().unwrap().is_connected());
    assert!(!state.connecting);
    assert_eq!(state.last_error, None);
    assert_eq!(h.session.source(), Some(AccountSource::Provider("suiWallet".into())));
    assert_eq!(Calls::get(&wallet.calls.request_connection), 1);
    assert_eq!(Calls::get(&wallet.calls.list_accounts), 1);
    assert!(!h.flag_set());
}

#[tokio::test]
async fn missing_provider_without_fallback_records_error() {
    let h = Harness::new(strict());

    let state = h.session.connect().await;

    assert_eq!(state.status(), SessionStatus::Disconnected);
    assert_eq!(
        state.last_error.as_deref(),
        Some("Wallet provider not found. Please install a wallet extension and refresh the page.")
    );
    assert!(!h.flag_set());
}

#[tokio::test]
async fn missing_provider_with_fallback_connects_simulated() {
    let h = Harness::new(development());

    let state = h.session.connect().await;

    assert_eq!(state.account.as_ref().map(|a| a.address()), Some(SIMULATED_ADDRESS));
    assert_eq!(h.session.source(), Some(AccountSource::Simulated));
    assert!(h.flag_set());
}

#[tokio::test]
async fn rejected_connection_falls_back_only_when_allowed() {
    let strict_h = Harness::new(strict());
    strict_h.inject("suiWallet", FakeProvider::full().rejecting_connection("User rejected the request"));
    let state = strict_h.session.connect().await;
    assert!(!state.is_connected());
    assert_eq!(state.last_error.as_deref(), Some("Wallet connection rejected: User rejected the request"));

    let dev = Harness::new(development());
    let wallet = dev.inject("suiWallet", FakeProvider::full().rejecting_connection("User rejected the request"));
    let state = dev.session.connect().await;
    assert_eq!(state.account.as_ref().map(|a| a.address()), Some(SIMULATED_ADDRESS));
    assert_eq!(state.last_error, None);
    assert_eq!(Calls::get(&wallet.calls.request_connection), 1);
}

#[tokio::test]
async fn list_accounts_alone_is_enough_to_connect() {
    let h = Harness::new(strict());
    let wallet = h.inject("sui", FakeProvider::full().with_capabilities(&[Capability::ListAccounts]));

    let state = h.session.connect().await;

    assert!(state.is_connected());
    assert_eq!(Calls::get(&wallet.calls.request_connection), 0);
    assert_eq!(h.session.source(), Some(AccountSource::Provider("sui".into())));
}

#[tokio::test]
async fn empty_account_list_is_a_rejection() {
    let h = Harness::new(strict());
    h.inject("suiWallet", FakeProvider::full().with_accounts(&[]));

    let state = h.session.connect().await;

    assert_eq!(state.last_error.as_deref(), Some("Wallet connection rejected: No accounts found"));
}

#[tokio::test]
async fn provider_without_account_listing_is_unsupported() {
    let h = Harness::new(strict());
    h.inject("wallet", FakeProvider::full().with_capabilities(&[Capability::RequestConnection, Capability::SignAndSubmit]));

    let state = h.session.connect().await;

    assert_eq!(state.last_error.as_deref(), Some("Wallet provider 'wallet' does not support listAccounts"));
}

#[tokio::test]
async fn first_candidate_binding_wins() {
    let h = Harness::new(strict());
    h.inject("wallet", FakeProvider::full().with_accounts(&["0xwallet"]));
    h.inject("suiWallet", FakeProvider::full().with_accounts(&["0xsuiwallet"]));

    let state = h.session.connect().await;

    assert_eq!(state.account.unwrap().address(), "0xsuiwallet");
}

#[tokio::test]
async fn disconnect_during_pending_connect_wins() {
    let h = Harness::new(strict());
    let gate = Arc::new(Notify::new());
    h.inject("suiWallet", FakeProvider::full().gated(gate.clone()));

    let session = h.session.clone();
    let pending = tokio::spawn(async move { session.connect().await });
    while !h.session.state().connecting {
        tokio::task::yield_now().await;
    }

    let state = h.session.disconnect().await;
    assert_eq!(state.status(), SessionStatus::Disconnected);

    gate.notify_one();
    let stale = pending.await.unwrap();
    assert!(!stale.is_connected());
    assert_eq!(h.session.state().status(), SessionStatus::Disconnected);
    assert_eq!(h.session.source(), None);
}

#[tokio::test]
async fn connect_while_connecting_is_ignored() {
    let h = Harness::new(strict());
    let gate = Arc::new(Notify::new());
    let wallet = h.inject("suiWallet", FakeProvider::full().gated(gate.clone()));

    let session = h.session.clone();
    let first = tokio::spawn(async move { session.connect().await });
    while !h.session.state().connecting {
        tokio::task::yield_now().await;
    }

    let second = h.session.connect().await;
    assert!(second.connecting);
    assert!(!second.is_connected());

    gate.notify_one();
    assert!(first.await.unwrap().is_connected());
    assert_eq!(Calls::get(&wallet.calls.request_connection), 1);

    // Already connected: another connect is a no-op too.
    assert!(h.session.connect().await.is_connected());
    assert_eq!(Calls::get(&wallet.calls.request_connection), 1);
}

#[tokio::test]
async fn reset_abandons_a_hung_connect() {
    let h = Harness::new(strict());
    let gate = Arc::new(Notify::new());
    h.inject("suiWallet", FakeProvider::full().gated(gate.clone()));

    let session = h.session.clone();
    let pending = tokio::spawn(async move { session.connect().await });
    while !h.session.state().connecting {
        tokio::task::yield_now().await;
    }

    let state = h.session.reset();
    assert_eq!(state, Default::default());

    gate.notify_one();
    pending.await.unwrap();
    assert_eq!(h.session.state().status(), SessionStatus::Disconnected);
}

#[tokio::test]
async fn connect_clears_previous_error() {
    let h = Harness::new(strict());
    assert!(h.session.connect().await.last_error.is_some());

    h.inject("suiWallet", FakeProvider::full());
    let state = h.session.connect().await;
    assert!(state.is_connected());
    assert_eq!(state.last_error, None);
}

#[tokio::test]
async fn disconnect_clears_flag_and_notifies_provider() {
    let h = Harness::new(strict());
    let wallet = h.inject("suiWallet", FakeProvider::full().failing_disconnect("already gone"));
    h.session.connect().await;

    let state = h.session.disconnect().await;

    assert_eq!(state.status(), SessionStatus::Disconnected);
    assert_eq!(state.last_error, None);
    assert_eq!(Calls::get(&wallet.calls.disconnect), 1);
    assert!(!h.flag_set());
}

#[tokio::test]
async fn disconnect_of_simulated_session_clears_flag() {
    let h = Harness::new(development());
    h.session.connect().await;
    assert!(h.flag_set());

    h.session.disconnect().await;
    assert!(!h.flag_set());
    assert!(!h.session.is_connected());
}

#[tokio::test]
async fn disconnect_when_idle_is_harmless() {
    let h = Harness::new(strict());
    let state = h.session.disconnect().await;
    assert_eq!(state.status(), SessionStatus::Disconnected);
}

#[tokio::test]
async fn restore_prefers_authorized_provider_account() {
    let h = Harness::with_flag(development(), MemoryFlag::with(FLAG_KEY, true));
    let wallet = h.inject("suiWallet", FakeProvider::full());

    let state = h.session.restore_session().await;

    assert_eq!(state.account.unwrap().address(), REAL_ADDRESS);
    assert_eq!(Calls::get(&wallet.calls.request_connection), 0);
}

#[tokio::test]
async fn restore_uses_flag_only_with_fallback() {
    let dev = Harness::with_flag(development(), MemoryFlag::with(FLAG_KEY, true));
    let state = dev.session.restore_session().await;
    assert_eq!(state.account.unwrap().address(), SIMULATED_ADDRESS);
    assert_eq!(dev.session.source(), Some(AccountSource::Simulated));

    let strict_h = Harness::with_flag(strict(), MemoryFlag::with(FLAG_KEY, true));
    let state = strict_h.session.restore_session().await;
    assert_eq!(state.status(), SessionStatus::Disconnected);
    assert_eq!(state.last_error, None);
}

#[tokio::test]
async fn restore_without_anything_stays_disconnected() {
    let h = Harness::new(development());
    h.inject("suiWallet", FakeProvider::full().with_accounts(&[]));

    let state = h.session.restore_session().await;

    assert_eq!(state, Default::default());
}

#[tokio::test]
async fn disconnect_during_restore_wins() {
    let h = Harness::with_flag(development(), MemoryFlag::with(FLAG_KEY, true));
    let gate = Arc::new(Notify::new());
    let wallet = h.inject("suiWallet", FakeProvider::full().gated_accounts(gate.clone()));

    let session = h.session.clone();
    let pending = tokio::spawn(async move { session.restore_session().await });
    while Calls::get(&wallet.calls.list_accounts) == 0 {
        tokio::task::yield_now().await;
    }

    assert_eq!(h.session.disconnect().await.status(), SessionStatus::Disconnected);

    gate.notify_one();
    assert!(!pending.await.unwrap().is_connected());
    assert_eq!(h.session.state().status(), SessionStatus::Disconnected);
    assert_eq!(h.session.source(), None);
    assert!(!h.flag_set());
}

#[tokio::test]
async fn reset_during_restore_wins() {
    let h = Harness::new(strict());
    let gate = Arc::new(Notify::new());
    let wallet = h.inject("suiWallet", FakeProvider::full().gated_accounts(gate.clone()));

    let session = h.session.clone();
    let pending = tokio::spawn(async move { session.restore_session().await });
    while Calls::get(&wallet.calls.list_accounts) == 0 {
        tokio::task::yield_now().await;
    }

    h.session.reset();
    gate.notify_one();

    assert!(!pending.await.unwrap().is_connected());
    assert_eq!(h.session.state(), Default::default());
}

#[tokio::test]
async fn subscribers_see_each_transition() {
    let h = Harness::new(development());
    let mut rx = h.session.subscribe();

    h.session.connect().await;
    h.session.disconnect().await;

    let connecting = rx.next().await.unwrap();
    assert!(connecting.connecting);
    let connected = rx.next().await.unwrap();
    assert_eq!(connected.account.unwrap().address(), SIMULATED_ADDRESS);
    let disconnected = rx.next().await.unwrap();
    assert_eq!(disconnected.status(), SessionStatus::Disconnected);
}
