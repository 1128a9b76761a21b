//! Integration tests for the atomic credit debit.

use adcraft_db::models::user::CreateUser;
use adcraft_db::repositories::{CreditRepo, UserRepo};
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, balance: i32) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: format!("credits-{balance}@example.com"),
            plan: "starter".into(),
            credit_balance: balance,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "./migrations")]
async fn debit_writes_balance_and_ledger(pool: PgPool) {
    let user_id = seed_user(&pool, 3).await;

    let entry = CreditRepo::debit(&pool, user_id, None, 2, "ai_visual")
        .await
        .unwrap()
        .expect("balance covers the cost");
    assert_eq!(entry.amount, -2);
    assert_eq!(entry.balance_after, 1);
    assert_eq!(entry.reason, "ai_visual");
    assert_eq!(UserRepo::balance(&pool, user_id).await.unwrap(), Some(1));
}

#[sqlx::test(migrations = "./migrations")]
async fn debit_refuses_when_balance_is_short(pool: PgPool) {
    let user_id = seed_user(&pool, 1).await;

    let entry = CreditRepo::debit(&pool, user_id, None, 2, "ai_visual").await.unwrap();
    assert!(entry.is_none());
    assert_eq!(UserRepo::balance(&pool, user_id).await.unwrap(), Some(1));
    assert!(CreditRepo::list_for_user(&pool, user_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_debits_are_all_recorded(pool: PgPool) {
    const N: i32 = 8;
    const COST: i32 = 2;
    let initial = 20;
    let user_id = seed_user(&pool, initial).await;

    let tasks: Vec<_> = (0..N)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { CreditRepo::debit(&pool, user_id, None, COST, "ai_visual").await })
        })
        .collect();
    for result in futures::future::join_all(tasks).await {
        assert!(result.unwrap().unwrap().is_some());
    }

    assert_eq!(
        UserRepo::balance(&pool, user_id).await.unwrap(),
        Some(initial - N * COST)
    );
    let ledger = CreditRepo::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(ledger.len(), N as usize);
    let mut balances: Vec<i32> = ledger.iter().map(|e| e.balance_after).collect();
    balances.sort_unstable();
    let expected: Vec<i32> = (0..N).map(|i| initial - (i + 1) * COST).rev().collect();
    assert_eq!(balances, expected);
}

#[sqlx::test(migrations = "./migrations")]
async fn oversubscribed_debits_never_go_negative(pool: PgPool) {
    let user_id = seed_user(&pool, 5).await;

    let tasks: Vec<_> = (0..12)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { CreditRepo::debit(&pool, user_id, None, 1, "ai_visual").await })
        })
        .collect();
    let succeeded = futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter(|r| matches!(r, Ok(Ok(Some(_)))))
        .count();

    assert_eq!(succeeded, 5);
    assert_eq!(UserRepo::balance(&pool, user_id).await.unwrap(), Some(0));
    assert_eq!(CreditRepo::list_for_user(&pool, user_id).await.unwrap().len(), 5);
}
