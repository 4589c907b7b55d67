use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::users::create_user,
        api::books::list_books,
        api::loans::create_loan,
        api::requests::decide_request,
        api::groups::create_group,
    ),
    components(
        schemas(
            crate::models::BookCandidate,
            crate::services::user_service::NewUser,
            crate::services::group_service::NewGroup,
            crate::domain::RejectReason,
            api::library::LibraryEntryRequest,
            api::loans::CreateLoanRequest,
            api::requests::CreateLoanRequestBody,
            api::requests::DecisionBody,
        )
    ),
    tags(
        (name = "bookswap", description = "BookSwap API")
    )
)]
pub struct ApiDoc;
