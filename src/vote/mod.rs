//! Vote domain: casting, listing, live standings

mod model;
mod service;

pub use model::{CampaignResults, CastVoteRequest, CastVoteResponse, ListVotesQuery};
pub use service::VoteService;
