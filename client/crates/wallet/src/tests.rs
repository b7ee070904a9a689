//! Unit tests for the wallet crate

#[cfg(test)]
mod request_shape_tests {
    use crate::domain::entities::*;
    use crate::domain::value_objects::*;
    use kernel::id::{ChamaId, MemberId};
    use serde_json::json;

    fn chama() -> ChamaId {
        "0b7f6c1e-5a42-4d0e-9c3b-2f8e1d6a4b90".parse().unwrap()
    }

    #[test]
    fn test_topup_body() {
        let op = WalletOperation::TopUp {
            chama_id: chama(),
            amount: Amount::new(500.0).unwrap(),
            wallet_type: WalletType::Savings,
            payment_method: Some(PaymentMethod::Mpesa),
        };
        assert_eq!(
            serde_json::to_value(op.to_request()).unwrap(),
            json!({
                "operation": "topup",
                "chamaId": "0b7f6c1e-5a42-4d0e-9c3b-2f8e1d6a4b90",
                "amount": 500.0,
                "walletType": "savings",
                "paymentMethod": "mpesa",
            })
        );
    }

    #[test]
    fn test_withdraw_body_carries_phone_as_recipient() {
        let op = WalletOperation::Withdraw {
            chama_id: chama(),
            amount: Amount::new(1200.456).unwrap(),
            payment_method: PaymentMethod::Bank,
            phone_number: " 0712345678 ".to_string(),
        };
        assert_eq!(
            serde_json::to_value(op.to_request()).unwrap(),
            json!({
                "operation": "withdraw",
                "chamaId": "0b7f6c1e-5a42-4d0e-9c3b-2f8e1d6a4b90",
                "amount": 1200.46,
                "recipient": "0712345678",
                "paymentMethod": "bank",
            })
        );
    }

    #[test]
    fn test_send_and_unlock_bodies() {
        let recipient: MemberId = "9d1e3f5a-7b2c-4e8d-a6f0-1c3b5d7e9f21".parse().unwrap();
        let send = WalletOperation::Send {
            chama_id: chama(),
            amount: Amount::new(75.0).unwrap(),
            recipient,
        };
        let body = serde_json::to_value(send.to_request()).unwrap();
        assert_eq!(body["operation"], "send");
        assert_eq!(body["recipient"], "9d1e3f5a-7b2c-4e8d-a6f0-1c3b5d7e9f21");
        assert!(body.get("paymentMethod").is_none());

        let unlock = WalletOperation::Unlock { chama_id: chama() };
        assert_eq!(
            serde_json::to_value(unlock.to_request()).unwrap(),
            json!({
                "operation": "unlock",
                "chamaId": "0b7f6c1e-5a42-4d0e-9c3b-2f8e1d6a4b90",
            })
        );
    }

    #[test]
    fn test_contribution_body() {
        let request =
            ContributionRequest::new(chama(), Amount::new(1000.0).unwrap(), PaymentMethod::Mpesa)
                .with_reference("QHX81K2L9P");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "chamaId": "0b7f6c1e-5a42-4d0e-9c3b-2f8e1d6a4b90",
                "amount": 1000.0,
                "paymentMethod": "mpesa",
                "paymentReference": "QHX81K2L9P",
            })
        );
    }
}

#[cfg(test)]
mod validation_tests {
    use crate::domain::entities::*;
    use crate::domain::services::*;
    use crate::domain::value_objects::*;
    use crate::error::WalletError;
    use kernel::error::kind::ErrorKind;
    use kernel::id::{ChamaId, MemberId};

    fn withdraw(amount: f64, phone: &str) -> WalletOperation {
        WalletOperation::Withdraw {
            chama_id: ChamaId::new(),
            amount: Amount::new(amount).unwrap(),
            payment_method: PaymentMethod::Mpesa,
            phone_number: phone.to_string(),
        }
    }

    #[test]
    fn test_withdraw_within_mgr_balance() {
        let balances = WalletBalances::new(0.0, 300.0);
        assert!(validate_operation(&withdraw(300.0, "0712345678"), &balances).is_ok());
    }

    #[test]
    fn test_withdraw_over_mgr_balance() {
        // Savings do not count towards withdrawals
        let balances = WalletBalances::new(10_000.0, 300.0);
        let err = validate_operation(&withdraw(300.01, "0712345678"), &balances).unwrap_err();
        assert!(matches!(err, WalletError::InsufficientBalance { .. }));
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
    }

    #[test]
    fn test_withdraw_needs_phone() {
        let balances = WalletBalances::new(0.0, 300.0);
        let err = validate_operation(&withdraw(100.0, "  "), &balances).unwrap_err();
        assert!(matches!(err, WalletError::MissingPhoneNumber));
    }

    #[test]
    fn test_send_over_balance() {
        let op = WalletOperation::Send {
            chama_id: ChamaId::new(),
            amount: Amount::new(50.0).unwrap(),
            recipient: MemberId::new(),
        };
        assert!(validate_operation(&op, &WalletBalances::new(0.0, 49.99)).is_err());
        assert!(validate_operation(&op, &WalletBalances::new(0.0, 50.0)).is_ok());
    }

    #[test]
    fn test_topup_ignores_balance() {
        let op = WalletOperation::TopUp {
            chama_id: ChamaId::new(),
            amount: Amount::new(1_000_000.0).unwrap(),
            wallet_type: WalletType::Mgr,
            payment_method: None,
        };
        assert!(validate_operation(&op, &WalletBalances::default()).is_ok());
    }

    #[test]
    fn test_parse_recipient() {
        assert!(matches!(parse_recipient(""), Err(WalletError::MissingRecipient)));
        assert!(matches!(
            parse_recipient("bob"),
            Err(WalletError::InvalidRecipient(_))
        ));
        let id = MemberId::new();
        assert_eq!(parse_recipient(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_refresh_keys() {
        let chama = ChamaId::new();
        assert_eq!(
            wallet_refresh_keys(chama),
            vec![
                format!("chama-members/{chama}"),
                format!("chama-transactions/{chama}"),
                "chama-notifications".to_string(),
            ]
        );
        assert_eq!(contribution_refresh_keys(chama).len(), 3);
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kernel::id::{ChamaId, UserId};
    use platform::http::BackendError;
    use platform::notify::{MemorySink, NotificationSink, Severity};
    use tokio_test::{assert_err, assert_ok};

    use crate::application::{ContributionUseCase, LeaderboardUseCase, WalletOpsUseCase};
    use crate::domain::entities::*;
    use crate::domain::gateway::WalletGateway;
    use crate::domain::leaderboard::{LeaderboardSort, MemberStanding};
    use crate::domain::value_objects::*;
    use crate::error::{WalletError, WalletResult};
    use crate::infra::InMemoryWalletGateway;

    /// Gateway answering with canned replies
    #[derive(Default)]
    struct ScriptedGateway {
        op_reply: Option<WalletOpResponse>,
        contribution_reply: Option<ContributionResponse>,
        fail_status: Option<(u16, &'static str)>,
        calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn failure(&self) -> Option<WalletError> {
            self.fail_status.map(|(status, message)| {
                WalletError::Service(BackendError::Status {
                    status,
                    message: message.to_string(),
                })
            })
        }
    }

    impl WalletGateway for ScriptedGateway {
        async fn fetch_balances(&self, _: ChamaId, _: UserId) -> WalletResult<WalletBalances> {
            Ok(WalletBalances::default())
        }

        async fn invoke_wallet_op(&self, _: &WalletOpRequest) -> WalletResult<WalletOpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failure() {
                Some(e) => Err(e),
                None => Ok(self.op_reply.clone().unwrap_or_default()),
            }
        }

        async fn make_contribution(
            &self,
            _: &ContributionRequest,
        ) -> WalletResult<ContributionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failure() {
                Some(e) => Err(e),
                None => Ok(self.contribution_reply.clone().unwrap_or_default()),
            }
        }

        async fn fetch_standings(
            &self,
            _: ChamaId,
            _: LeaderboardSort,
        ) -> WalletResult<Vec<MemberStanding>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failure() {
                Some(e) => Err(e),
                None => Ok(Vec::new()),
            }
        }
    }

    fn sink() -> (Arc<MemorySink>, Arc<dyn NotificationSink>) {
        let sink = Arc::new(MemorySink::new());
        let notifier: Arc<dyn NotificationSink> = sink.clone();
        (sink, notifier)
    }

    fn topup(chama_id: ChamaId) -> WalletOperation {
        WalletOperation::TopUp {
            chama_id,
            amount: Amount::new(250.0).unwrap(),
            wallet_type: WalletType::Savings,
            payment_method: Some(PaymentMethod::Mpesa),
        }
    }

    #[tokio::test]
    async fn test_success_uses_backend_message() {
        let gateway = Arc::new(ScriptedGateway {
            op_reply: Some(WalletOpResponse {
                success: Some(true),
                message: Some("Top-up of KES 250 received".into()),
                error: None,
            }),
            ..Default::default()
        });
        let (sink, notifier) = sink();
        let use_case = WalletOpsUseCase::new(gateway, notifier);
        let chama = ChamaId::new();

        let receipt = assert_ok!(
            use_case
                .execute(topup(chama), &WalletBalances::default())
                .await
        );
        assert_eq!(receipt.message, "Top-up of KES 250 received");
        assert!(receipt.refresh.contains(&format!("chama-transactions/{chama}")));

        let note = sink.last().unwrap();
        assert_eq!(note.title, "Success");
        assert_eq!(note.severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_success_without_message_uses_default() {
        let gateway = Arc::new(ScriptedGateway::default());
        let (sink, notifier) = sink();
        let use_case = WalletOpsUseCase::new(gateway, notifier);

        let receipt = assert_ok!(
            use_case
                .execute(topup(ChamaId::new()), &WalletBalances::default())
                .await
        );
        assert_eq!(receipt.message, "Operation completed successfully");
        assert_eq!(sink.last().unwrap().description, "Operation completed successfully");
    }

    #[tokio::test]
    async fn test_backend_error_is_notified() {
        let gateway = Arc::new(ScriptedGateway {
            fail_status: Some((400, "Withdrawals are locked")),
            ..Default::default()
        });
        let (sink, notifier) = sink();
        let use_case = WalletOpsUseCase::new(gateway, notifier);

        let err = assert_err!(
            use_case
                .execute(topup(ChamaId::new()), &WalletBalances::default())
                .await
        );
        assert!(matches!(err, WalletError::Service(_)));

        let note = sink.last().unwrap();
        assert_eq!(note.title, "Error");
        assert_eq!(note.description, "Withdrawals are locked");
        assert_eq!(note.severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_backend_error_without_message_uses_default() {
        let gateway = Arc::new(ScriptedGateway {
            fail_status: Some((500, "")),
            ..Default::default()
        });
        let (sink, notifier) = sink();
        let use_case = WalletOpsUseCase::new(gateway, notifier);

        assert_err!(
            use_case
                .execute(topup(ChamaId::new()), &WalletBalances::default())
                .await
        );
        assert_eq!(sink.last().unwrap().description, "Operation failed");
    }

    #[tokio::test]
    async fn test_validation_failure_skips_gateway() {
        let gateway = Arc::new(ScriptedGateway::default());
        let (sink, notifier) = sink();
        let use_case = WalletOpsUseCase::new(gateway.clone(), notifier);

        let op = WalletOperation::Withdraw {
            chama_id: ChamaId::new(),
            amount: Amount::new(500.0).unwrap(),
            payment_method: PaymentMethod::Mpesa,
            phone_number: "0712345678".into(),
        };
        let err = assert_err!(use_case.execute(op, &WalletBalances::new(0.0, 100.0)).await);

        assert!(matches!(err, WalletError::InsufficientBalance { .. }));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_contribution_success() {
        let gateway = Arc::new(ScriptedGateway {
            contribution_reply: Some(ContributionResponse {
                success: true,
                ..Default::default()
            }),
            ..Default::default()
        });
        let (sink, notifier) = sink();
        let use_case = ContributionUseCase::new(gateway, notifier);
        let chama = ChamaId::new();

        let receipt = assert_ok!(
            use_case
                .execute(ContributionRequest::new(
                    chama,
                    Amount::new(1000.0).unwrap(),
                    PaymentMethod::Mpesa
                ))
                .await
        );
        assert!(receipt.refresh.contains(&format!("chama-leaderboard/{chama}")));
        assert_eq!(sink.last().unwrap().title, "Contribution Made!");
    }

    #[tokio::test]
    async fn test_contribution_rejected_by_backend() {
        let gateway = Arc::new(ScriptedGateway {
            contribution_reply: Some(ContributionResponse {
                success: false,
                error: Some("Chama is not accepting contributions".into()),
                message: None,
            }),
            ..Default::default()
        });
        let (sink, notifier) = sink();
        let use_case = ContributionUseCase::new(gateway, notifier);

        let err = assert_err!(
            use_case
                .execute(ContributionRequest::new(
                    ChamaId::new(),
                    Amount::new(1000.0).unwrap(),
                    PaymentMethod::Card
                ))
                .await
        );
        assert!(matches!(err, WalletError::Rejected(_)));
        assert_eq!(
            sink.last().unwrap().description,
            "Chama is not accepting contributions"
        );
    }

    #[tokio::test]
    async fn test_contribution_rejected_without_reason() {
        let gateway = Arc::new(ScriptedGateway::default());
        let (sink, notifier) = sink();
        let use_case = ContributionUseCase::new(gateway, notifier);

        assert_err!(
            use_case
                .execute(ContributionRequest::new(
                    ChamaId::new(),
                    Amount::new(10.0).unwrap(),
                    PaymentMethod::Mpesa
                ))
                .await
        );
        assert_eq!(sink.last().unwrap().description, "Failed to make contribution");
    }

    #[tokio::test]
    async fn test_in_memory_gateway_moves_balances() {
        let chama = ChamaId::new();
        let gateway = Arc::new(
            InMemoryWalletGateway::new()
                .with_balances(chama, WalletBalances::new(0.0, 400.0))
                .await,
        );
        let (sink, notifier) = sink();
        let ops = WalletOpsUseCase::new(gateway.clone(), notifier.clone());
        let contributions = ContributionUseCase::new(gateway.clone(), notifier);

        let withdraw = WalletOperation::Withdraw {
            chama_id: chama,
            amount: Amount::new(150.0).unwrap(),
            payment_method: PaymentMethod::Mpesa,
            phone_number: "0712345678".into(),
        };
        let balances = gateway.fetch_balances(chama, UserId::new()).await.unwrap();
        assert_ok!(ops.execute(withdraw, &balances).await);
        assert_ok!(
            contributions
                .execute(ContributionRequest::new(
                    chama,
                    Amount::new(500.0).unwrap(),
                    PaymentMethod::Mpesa
                ))
                .await
        );

        assert_eq!(gateway.balances(chama).await, WalletBalances::new(500.0, 250.0));
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_in_memory_gateway_refuses_overdraft() {
        let chama = ChamaId::new();
        let gateway = Arc::new(InMemoryWalletGateway::new());
        let (sink, notifier) = sink();
        let ops = WalletOpsUseCase::new(gateway.clone(), notifier);

        let send = WalletOperation::Send {
            chama_id: chama,
            amount: Amount::new(10.0).unwrap(),
            recipient: kernel::id::MemberId::new(),
        };
        // Stale balances let the request through; the ledger still refuses it
        let err = assert_err!(ops.execute(send, &WalletBalances::new(0.0, 10.0)).await);
        assert!(matches!(err, WalletError::Rejected(_)));
        assert_eq!(sink.last().unwrap().description, "Insufficient MGR balance");
    }

    fn member(email: &str, contributed: f64, savings: f64) -> MemberStanding {
        MemberStanding {
            member_id: kernel::id::MemberId::new(),
            user_id: UserId::new(),
            role: "member".into(),
            email: Some(email.into()),
            full_name: None,
            total_contributed: contributed,
            savings_balance: savings,
            mgr_balance: 0.0,
            last_contribution_date: None,
        }
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_in_memory_members() {
        let chama = ChamaId::new();
        let gateway = Arc::new(
            InMemoryWalletGateway::new()
                .with_member(chama, member("wanjiru@example.com", 1_500.0, 800.0))
                .await
                .with_member(chama, member("amina@example.com", 4_000.0, 100.0))
                .await
                .with_member(ChamaId::new(), member("elsewhere@example.com", 9_000.0, 0.0))
                .await,
        );
        let leaderboard = LeaderboardUseCase::new(gateway);

        let ranked = assert_ok!(
            leaderboard
                .execute(chama, LeaderboardSort::MostContributing)
                .await
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].standing.display_name(), "amina@example.com");

        let ranked = assert_ok!(leaderboard.execute(chama, LeaderboardSort::TopSaver).await);
        assert_eq!(ranked[0].standing.display_name(), "wanjiru@example.com");
    }

    #[tokio::test]
    async fn test_leaderboard_failure_is_not_notified() {
        let gateway = Arc::new(ScriptedGateway {
            fail_status: Some((503, "")),
            ..Default::default()
        });
        let leaderboard = LeaderboardUseCase::new(gateway.clone());

        let err = assert_err!(
            leaderboard
                .execute(ChamaId::new(), LeaderboardSort::Alphabetical)
                .await
        );
        assert!(err.kind().is_retryable());
        assert_eq!(err.action(), Some("Please try again"));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }
}
