//! Campaign domain: campaigns, categories, nominees, and vote protection

mod model;
mod service;

pub use model::{
    CreateCampaignRequest, CreateCategoryRequest, CreateNomineeRequest, ListCampaignsQuery,
    UpdateCampaignRequest,
};
pub use service::CampaignService;
