//! Moderation ports: pins, audits, reports, and feedback.

use std::future::Future;

use community_domain::error::CommunityError;
use community_domain::feedback::{Feedback, NewFeedback};
use community_domain::id::{FeedbackId, PostId, ReportId, UserId};
use community_domain::message::NewMessage;
use community_domain::moderation::{Audit, AuditEntry, AuditStatus, PinEntry, PinKind, Review};
use community_domain::page::{PageRequest, Paged};
use community_domain::relation::Toggle;
use community_domain::report::{NewReport, ReportKind, ReportReason};
use community_domain::time::Timestamp;

/// The stick and recommend lists, which differ only by table and post flag.
pub trait PinRepository {
    /// Insert or remove the pin row and set the matching post flag, atomically.
    fn toggle_pin(
        &self,
        kind: PinKind,
        post: PostId,
        admin: UserId,
        end_time: Option<Timestamp>,
        at: Timestamp,
    ) -> impl Future<Output = Result<Toggle, CommunityError>> + Send;

    /// Pins whose `end_time` is unset or after `now`, newest first.
    fn list_pins(
        &self,
        kind: PinKind,
        now: Timestamp,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<PinEntry>, CommunityError>> + Send;

    fn is_pinned(
        &self,
        kind: PinKind,
        post: PostId,
        now: Timestamp,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send;
}

pub trait AuditRepository {
    fn find_audit(&self, post: PostId)
    -> impl Future<Output = Result<Option<Audit>, CommunityError>> + Send;

    fn find_audit_entry(
        &self,
        post: PostId,
    ) -> impl Future<Output = Result<Option<AuditEntry>, CommunityError>> + Send;

    fn create_audit(
        &self,
        post: PostId,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    /// Record the decision, apply it to the post, and deliver `notice`, atomically.
    fn review_audit(
        &self,
        review: Review,
        notice: NewMessage,
    ) -> impl Future<Output = Result<(), CommunityError>> + Send;

    fn list_audits(
        &self,
        status: AuditStatus,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<AuditEntry>, CommunityError>> + Send;
}

pub trait ReportRepository {
    /// Visible reasons of a kind, by weight.
    fn list_reasons(
        &self,
        kind: ReportKind,
    ) -> impl Future<Output = Result<Vec<ReportReason>, CommunityError>> + Send;

    fn has_pending_report(
        &self,
        user: UserId,
        kind: ReportKind,
        target_id: i64,
    ) -> impl Future<Output = Result<bool, CommunityError>> + Send;

    fn create_report(
        &self,
        report: NewReport,
    ) -> impl Future<Output = Result<ReportId, CommunityError>> + Send;
}

pub trait FeedbackRepository {
    fn create_feedback(
        &self,
        feedback: NewFeedback,
    ) -> impl Future<Output = Result<FeedbackId, CommunityError>> + Send;

    fn list_feedback(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Paged<Feedback>, CommunityError>> + Send;
}
