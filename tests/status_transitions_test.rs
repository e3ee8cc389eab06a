mod common;

use std::sync::atomic::Ordering;

use common::{at, loaded_view, task};
use studygrid::models::TaskStatus;

#[tokio::test]
async fn test_overdue_pending_task_is_skipped() {
    let fx = loaded_view(
        vec![task(1, "2025-06-10", "20:00", "20:59")],
        at(2025, 6, 10, 21, 5),
    )
    .await;

    let stats = fx.view.status_service().skip_overdue().await;

    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(fx.view.board().get(1).unwrap().status, TaskStatus::Skipped);
    assert_eq!(fx.api.updates(), vec![(1, TaskStatus::Skipped)]);
}

#[tokio::test]
async fn test_running_and_future_tasks_untouched() {
    let fx = loaded_view(
        vec![
            task(1, "2025-06-10", "09:00", "10:00"),
            task(2, "2025-06-10", "10:00", "11:00"),
            task(3, "2025-06-11", "09:00", "10:00"),
        ],
        at(2025, 6, 10, 10, 0),
    )
    .await;

    let stats = fx.view.status_service().skip_overdue().await;

    // task 1 ends exactly now, which is not strictly before now
    assert_eq!(stats.overdue, 0);
    assert!(fx.api.updates().is_empty());
    assert!(fx
        .view
        .board()
        .snapshot()
        .iter()
        .all(|t| t.status == TaskStatus::Pending));
}

#[tokio::test]
async fn test_failed_remote_update_keeps_task_pending() {
    let fx = loaded_view(
        vec![task(1, "2025-06-09", "09:00", "10:00")],
        at(2025, 6, 10, 12, 0),
    )
    .await;
    fx.api.fail_updates.store(true, Ordering::SeqCst);

    let service = fx.view.status_service();
    let stats = service.skip_overdue().await;
    assert_eq!(stats.failed, 1);
    assert_eq!(fx.view.board().get(1).unwrap().status, TaskStatus::Pending);

    // retried on the next scan once the store recovers
    fx.api.fail_updates.store(false, Ordering::SeqCst);
    let stats = service.skip_overdue().await;
    assert_eq!(stats.skipped, 1);
    assert_eq!(fx.view.board().get(1).unwrap().status, TaskStatus::Skipped);
    assert_eq!(fx.api.updates().len(), 2);
}

#[tokio::test]
async fn test_completed_tasks_never_auto_skipped() {
    let mut done = task(1, "2025-06-09", "09:00", "10:00");
    done.status = TaskStatus::Completed;
    let fx = loaded_view(vec![done], at(2025, 6, 12, 12, 0)).await;

    let stats = fx.view.status_service().skip_overdue().await;

    assert_eq!(stats.overdue, 0);
    assert!(fx.api.updates().is_empty());
    assert_eq!(fx.view.board().get(1).unwrap().status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_overlapping_scans_do_not_corrupt_state() {
    let fx = loaded_view(
        vec![
            task(1, "2025-06-09", "09:00", "10:00"),
            task(2, "2025-06-09", "10:00", "11:00"),
        ],
        at(2025, 6, 10, 12, 0),
    )
    .await;
    let service = fx.view.status_service();

    let (first, second) = tokio::join!(service.skip_overdue(), service.skip_overdue());

    assert_eq!(first.skipped + second.skipped, 2);
    let snapshot = fx.view.board().snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().all(|t| t.status == TaskStatus::Skipped));
}

#[tokio::test]
async fn test_malformed_task_does_not_stop_scan() {
    let fx = loaded_view(
        vec![
            task(1, "2025-06-09", "bad", "nope"),
            task(2, "2025-06-09", "09:00", "10:00"),
        ],
        at(2025, 6, 10, 12, 0),
    )
    .await;

    let stats = fx.view.status_service().skip_overdue().await;

    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(fx.view.board().get(2).unwrap().status, TaskStatus::Skipped);
}

#[tokio::test]
async fn test_click_completes_and_opens_link() {
    let fx = loaded_view(
        vec![task(5, "2025-06-10", "09:00", "10:00")],
        at(2025, 6, 10, 9, 30),
    )
    .await;

    let outcome = fx.view.open_task(5).unwrap();

    // local state flips before the remote call resolves
    assert!(outcome.completed_now);
    assert_eq!(outcome.status, TaskStatus::Completed);
    assert_eq!(fx.view.board().get(5).unwrap().status, TaskStatus::Completed);
    assert_eq!(
        *fx.opener.opened.lock().unwrap(),
        vec!["https://example.com/resource/5".to_string()]
    );

    outcome.remote_update.unwrap().await.unwrap();
    assert_eq!(fx.api.updates(), vec![(5, TaskStatus::Completed)]);
}

#[tokio::test]
async fn test_click_opens_link_even_when_remote_fails() {
    let fx = loaded_view(
        vec![task(5, "2025-06-09", "09:00", "10:00")],
        at(2025, 6, 10, 9, 30),
    )
    .await;
    fx.api.fail_updates.store(true, Ordering::SeqCst);

    let outcome = fx.view.open_task(5).unwrap();
    outcome.remote_update.unwrap().await.unwrap();

    assert_eq!(fx.opener.opened.lock().unwrap().len(), 1);
    // optimistic state is kept until the next refresh
    assert_eq!(fx.view.board().get(5).unwrap().status, TaskStatus::Completed);

    fx.api.fail_updates.store(false, Ordering::SeqCst);
    fx.view.refresh().await.unwrap();
    assert_eq!(fx.view.board().get(5).unwrap().status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_click_on_skipped_task_completes_it() {
    let mut skipped = task(5, "2025-06-09", "09:00", "10:00");
    skipped.status = TaskStatus::Skipped;
    let fx = loaded_view(vec![skipped], at(2025, 6, 10, 9, 30)).await;

    let outcome = fx.view.open_task(5).unwrap();

    assert!(outcome.completed_now);
    assert_eq!(fx.view.board().get(5).unwrap().status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_click_before_start_only_opens_link() {
    let fx = loaded_view(
        vec![task(5, "2025-06-12", "09:00", "10:00")],
        at(2025, 6, 10, 9, 30),
    )
    .await;

    let outcome = fx.view.open_task(5).unwrap();

    assert!(!outcome.completed_now);
    assert!(outcome.remote_update.is_none());
    assert_eq!(outcome.status, TaskStatus::Pending);
    assert_eq!(fx.opener.opened.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_click_on_completed_task_changes_nothing() {
    let mut done = task(5, "2025-06-09", "09:00", "10:00");
    done.status = TaskStatus::Completed;
    let fx = loaded_view(vec![done], at(2025, 6, 10, 9, 30)).await;

    let outcome = fx.view.open_task(5).unwrap();

    assert!(!outcome.completed_now);
    assert!(fx.api.updates().is_empty());
    assert_eq!(fx.opener.opened.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_click_unknown_task_is_not_found() {
    let fx = loaded_view(Vec::new(), at(2025, 6, 10, 9, 30)).await;
    assert!(fx.view.open_task(42).is_err());
    assert!(fx.opener.opened.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_click_during_scan_is_not_overwritten_remotely() {
    let fx = loaded_view(
        vec![
            task(1, "2025-06-09", "09:00", "10:00"),
            task(2, "2025-06-09", "11:00", "12:00"),
        ],
        at(2025, 6, 10, 12, 0),
    )
    .await;

    let gate = fx.api.update_gate.lock().await;
    let service = fx.view.status_service();
    let scan = tokio::spawn(async move { service.skip_overdue().await });
    while fx.api.waiting_updates.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    let outcome = fx.view.open_task(2).unwrap();
    assert!(outcome.completed_now);
    drop(gate);

    let stats = scan.await.unwrap();
    outcome.remote_update.unwrap().await.unwrap();

    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.skipped, 1);
    assert!(!fx.api.updates().contains(&(2, TaskStatus::Skipped)));
    assert_eq!(fx.view.board().get(2).unwrap().status, TaskStatus::Completed);
    let stored = fx.api.tasks.lock().unwrap().clone();
    assert_eq!(stored[1].status, TaskStatus::Completed);
}
