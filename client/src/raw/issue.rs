use samaj_shared::issue::{
    handle::{IssueFeed, IssueTarget, ReportIssueDescriptor, ReportIssueResult},
    Issue,
};

super::json_requests! {
    Report(ReportIssueDescriptor) => "/api/issue/report": ReportIssueResult,
    MarkResolved(IssueTarget) => "/api/issue/mark-resolved": (),
}

super::empty_requests! {
    Mine => "/api/issue/mine": Vec<Issue>,
    Feed => "/api/issue/feed": IssueFeed,
}
