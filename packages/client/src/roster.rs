//! Client roster: the user list merged with live presence and unread counts.
//!
//! The list comes from `GET /api/users`; presence and counters arrive on the
//! WebSocket and may arrive first. Updates for users not on the list yet are
//! parked in a [`DeferredApply`] and applied when the list (re)loads.

use std::collections::BTreeMap;

use hanashi_server::infrastructure::dto::{http::UserSummaryDto, websocket::OnlineUsersPayload};

use crate::deferred::DeferredApply;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub online: bool,
    pub unread: u32,
}

impl From<UserSummaryDto> for RosterRow {
    fn from(dto: UserSummaryDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            avatar: dto.avatar,
            online: false,
            unread: 0,
        }
    }
}

#[derive(Debug)]
pub struct RosterReconciler {
    /// The local user, never listed
    me: String,
    rows: BTreeMap<String, RosterRow>,
    pending_unread: DeferredApply<String, u32>,
    pending_presence: DeferredApply<String, bool>,
}

impl RosterReconciler {
    pub fn new(me: impl Into<String>) -> Self {
        Self {
            me: me.into(),
            rows: BTreeMap::new(),
            pending_unread: DeferredApply::new(),
            pending_presence: DeferredApply::new(),
        }
    }

    /// Replace the list, keeping live state of rows that are still present,
    /// then apply every buffered update that now has a row.
    ///
    /// Returns the number of buffered updates applied.
    pub fn load_roster(&mut self, users: Vec<UserSummaryDto>) -> usize {
        let mut previous = std::mem::take(&mut self.rows);
        for user in users {
            if user.id == self.me {
                continue;
            }
            let mut row = RosterRow::from(user);
            if let Some(old) = previous.remove(&row.id) {
                row.online = old.online;
                row.unread = old.unread;
            }
            self.rows.insert(row.id.clone(), row);
        }

        let rows = &mut self.rows;
        let unread = self.pending_unread.drain(|id, count| match rows.get_mut(id) {
            Some(row) => {
                row.unread = count;
                Ok(())
            }
            None => Err(count),
        });
        let presence = self.pending_presence.drain(|id, online| match rows.get_mut(id) {
            Some(row) => {
                row.online = online;
                Ok(())
            }
            None => Err(online),
        });
        tracing::debug!(
            "Roster loaded: {} rows, {} buffered updates applied",
            self.rows.len(),
            unread + presence
        );
        unread + presence
    }

    /// Set the unread badge for `sender_id`. Returns `false` if buffered.
    pub fn apply_unread(&mut self, sender_id: &str, count: u32) -> bool {
        let rows = &mut self.rows;
        self.pending_unread
            .offer(sender_id.to_string(), count, |id, count| {
                match rows.get_mut(id) {
                    Some(row) => {
                        row.unread = count;
                        Ok(())
                    }
                    None => Err(count),
                }
            })
    }

    /// Set one user's online flag. Returns `false` if buffered.
    pub fn set_online(&mut self, user_id: &str, online: bool) -> bool {
        if user_id == self.me {
            return true;
        }
        let rows = &mut self.rows;
        self.pending_presence
            .offer(user_id.to_string(), online, |id, online| {
                match rows.get_mut(id) {
                    Some(row) => {
                        row.online = online;
                        Ok(())
                    }
                    None => Err(online),
                }
            })
    }

    /// Apply an `online-users-updated` event: a full set, a diff, or both.
    pub fn apply_presence(&mut self, payload: &OnlineUsersPayload) {
        if let Some(users) = &payload.users {
            // A full set overrides anything buffered so far.
            self.pending_presence = DeferredApply::new();
            for row in self.rows.values_mut() {
                row.online = false;
            }
            for user in users {
                self.set_online(user, true);
            }
        }
        for user in payload.added.iter().flatten() {
            self.set_online(user, true);
        }
        for user in payload.removed.iter().flatten() {
            self.set_online(user, false);
        }
    }

    pub fn row(&self, id: &str) -> Option<&RosterRow> {
        self.rows.get(id)
    }

    /// Rows sorted by user id
    pub fn rows(&self) -> impl Iterator<Item = &RosterRow> {
        self.rows.values()
    }

    pub fn pending_count(&self) -> usize {
        self.pending_unread.len() + self.pending_presence.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> UserSummaryDto {
        UserSummaryDto {
            id: id.to_string(),
            name: id.to_uppercase(),
            avatar: None,
        }
    }

    fn unread_of(roster: &RosterReconciler, id: &str) -> Option<u32> {
        roster.row(id).map(|row| row.unread)
    }

    #[test]
    fn test_counter_before_roster_is_applied_on_load() {
        // テスト項目: 名簿の読み込み前に届いた未読数が、読み込み後にバッジへ反映される
        // given (前提条件):
        let mut roster = RosterReconciler::new("u2");

        // when (操作):
        let applied_now = roster.apply_unread("u1", 1);
        let drained = roster.load_roster(vec![summary("u1"), summary("u2")]);

        // then (期待する結果):
        assert!(!applied_now);
        assert_eq!(drained, 1);
        assert_eq!(unread_of(&roster, "u1"), Some(1));
        assert_eq!(roster.pending_count(), 0);
        // 自分自身は名簿に含まれない
        assert!(roster.row("u2").is_none());
    }

    #[test]
    fn test_counter_for_unknown_user_stays_buffered() {
        // テスト項目: 名簿にないユーザーの未読数は、名簿に現れるまで保持される
        // given (前提条件):
        let mut roster = RosterReconciler::new("u2");
        roster.apply_unread("u9", 4);

        // when (操作):
        roster.load_roster(vec![summary("u1")]);

        // then (期待する結果):
        assert_eq!(roster.pending_count(), 1);
        assert!(roster.row("u9").is_none());

        // when (操作): 再読み込みで u9 が現れる
        roster.load_roster(vec![summary("u1"), summary("u9")]);

        // then (期待する結果):
        assert_eq!(unread_of(&roster, "u9"), Some(4));
        assert_eq!(roster.pending_count(), 0);
    }

    #[test]
    fn test_reload_keeps_live_state() {
        // テスト項目: 名簿の再読み込みでオンライン状態と未読数が失われない
        // given (前提条件):
        let mut roster = RosterReconciler::new("me");
        roster.load_roster(vec![summary("u1")]);
        roster.apply_unread("u1", 2);
        roster.set_online("u1", true);

        // when (操作):
        roster.load_roster(vec![summary("u1"), summary("u3")]);

        // then (期待する結果):
        let row = roster.row("u1").unwrap();
        assert!(row.online);
        assert_eq!(row.unread, 2);
        assert!(!roster.row("u3").unwrap().online);
    }

    #[test]
    fn test_presence_snapshot_and_diffs() {
        // テスト項目: オンライン一覧の全体と差分が名簿に反映され、未知のユーザーはバッファされる
        // given (前提条件):
        let mut roster = RosterReconciler::new("me");
        roster.load_roster(vec![summary("u1"), summary("u2")]);

        // when (操作):
        roster.apply_presence(&OnlineUsersPayload {
            users: Some(vec!["me".to_string(), "u1".to_string(), "u5".to_string()]),
            ..Default::default()
        });
        roster.apply_presence(&OnlineUsersPayload {
            added: Some(vec!["u2".to_string()]),
            removed: Some(vec!["u1".to_string()]),
            ..Default::default()
        });

        // then (期待する結果):
        assert!(!roster.row("u1").unwrap().online);
        assert!(roster.row("u2").unwrap().online);
        assert_eq!(roster.pending_count(), 1);

        roster.load_roster(vec![summary("u1"), summary("u2"), summary("u5")]);
        assert!(roster.row("u5").unwrap().online);
    }

    #[test]
    fn test_reconnect_matches_staying_connected() {
        // テスト項目: 再接続後の初期未読数 + 名簿読み込みの結果が、接続し続けた場合と一致する
        // given (前提条件): 接続し続けたクライアントはすべての更新をリアルタイムに受け取る
        let users = vec![summary("u1"), summary("u3")];
        let live_updates = [("u1", 1), ("u3", 1), ("u1", 2), ("u1", 0), ("u1", 1)];
        let mut stayed = RosterReconciler::new("u2");
        stayed.load_roster(users.clone());
        for (sender, count) in live_updates {
            stayed.apply_unread(sender, count);
        }

        // when (操作): 再接続したクライアントはサーバーの最終状態だけを受け取り、その後に名簿を読み込む
        let mut reconnected = RosterReconciler::new("u2");
        for (sender, count) in [("u1", 1), ("u3", 1)] {
            reconnected.apply_unread(sender, count);
        }
        reconnected.load_roster(users);

        // then (期待する結果):
        let stayed_rows: Vec<&RosterRow> = stayed.rows().collect();
        let reconnected_rows: Vec<&RosterRow> = reconnected.rows().collect();
        assert_eq!(stayed_rows, reconnected_rows);
    }
}
