use samaj_shared::opportunity::{
    handle::{
        CreateOpportunityDescriptor, CreateOpportunityResult, OpportunityTarget, OwnedOpportunity,
    },
    Opportunity, OpportunityStatus,
};

super::json_requests! {
    Create(CreateOpportunityDescriptor) => "/api/opportunity/create": CreateOpportunityResult,
    SignUp(OpportunityTarget) => "/api/opportunity/sign-up": OpportunityStatus,
    Cancel(OpportunityTarget) => "/api/opportunity/cancel": (),
    Close(OpportunityTarget) => "/api/opportunity/close": (),
}

super::empty_requests! {
    /// Lists open opportunities.
    List => "/api/opportunity/list": Vec<Opportunity>,
    /// Lists opportunities of the current NGO with their rosters.
    Mine => "/api/opportunity/mine": Vec<OwnedOpportunity>,
}
