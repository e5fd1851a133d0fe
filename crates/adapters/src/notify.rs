// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake messaging adapter for testing

use async_trait::async_trait;
use stays_core::{Messenger, Notice, NotifyError, UserId};
use std::sync::{Arc, Mutex};

/// Who a notice was delivered to
#[derive(Debug, Clone, PartialEq)]
pub enum Audience {
    User(UserId),
    Managers,
}

/// Recorded notification
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeCall {
    pub audience: Audience,
    pub notice: Notice,
}

/// Fake messenger that records every notice
#[derive(Clone, Default)]
pub struct FakeMessenger {
    calls: Arc<Mutex<Vec<NoticeCall>>>,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded notices
    pub fn calls(&self) -> Vec<NoticeCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Notices sent to the managers channel
    pub fn manager_notices(&self) -> Vec<Notice> {
        self.calls()
            .into_iter()
            .filter(|c| c.audience == Audience::Managers)
            .map(|c| c.notice)
            .collect()
    }

    /// Notices sent to one user
    pub fn user_notices(&self, user_id: UserId) -> Vec<Notice> {
        self.calls()
            .into_iter()
            .filter(|c| c.audience == Audience::User(user_id))
            .map(|c| c.notice)
            .collect()
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn notify_user(&self, user_id: UserId, notice: &Notice) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(NoticeCall {
                audience: Audience::User(user_id),
                notice: notice.clone(),
            });
        Ok(())
    }

    async fn notify_managers(&self, notice: &Notice) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(NoticeCall {
                audience: Audience::Managers,
                notice: notice.clone(),
            });
        Ok(())
    }
}
