use samaj_shared::food::{
    handle::{CreateFoodRequestDescriptor, CreateFoodRequestResult, DecideFoodRequestDescriptor},
    FoodRequest,
};

super::json_requests! {
    Create(CreateFoodRequestDescriptor) => "/api/food/create": CreateFoodRequestResult,
    Decide(DecideFoodRequestDescriptor) => "/api/food/decide": FoodRequest,
}

super::empty_requests! {
    Pending => "/api/food/pending": Vec<FoodRequest>,
}
