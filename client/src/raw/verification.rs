use samaj_shared::verification::{
    handle::{
        ListVerificationsDescriptor, VerificationActionResult, VerificationList,
        VerificationTarget,
    },
    NgoProfile,
};

use reqwest::{RequestBuilder, Response};

super::json_requests! {
    ListPending(ListVerificationsDescriptor) => "/api/verification/pending": VerificationList,
    ListApproved(ListVerificationsDescriptor) => "/api/verification/approved": VerificationList,
    Approve(VerificationTarget) => "/api/verification/approve": VerificationActionResult,
    Reject(VerificationTarget) => "/api/verification/reject": VerificationActionResult,
    Revoke(VerificationTarget) => "/api/verification/revoke": VerificationActionResult,
    /// Repairs a profile role left behind by a failed approval or revocation.
    Reconcile(VerificationTarget) => "/api/verification/reconcile": VerificationActionResult,
}

/// Lists approved NGOs.
#[derive(Debug, Clone, Copy)]
pub struct Directory;

#[async_trait::async_trait]
impl super::Request for Directory {
    type Output = Vec<NgoProfile>;
    const URL_SUFFIX: &'static str = "/api/organizations";
    const METHOD: reqwest::Method = reqwest::Method::GET;

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        Ok(response.json().await?)
    }
}
