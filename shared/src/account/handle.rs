use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterDescriptor {
    pub name: String,
    pub email: lettre::Address,
    pub password: String,
    pub confirm_password: String,
    pub role: super::RegisterRole,
    /// Required if registering as an NGO.
    #[serde(default)]
    pub ngo: Option<NgoApplication>,
    /// Required if registering as a restaurant.
    #[serde(default)]
    pub restaurant: Option<RestaurantApplication>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NgoApplication {
    pub org_name: String,
    pub description: String,
    pub address: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    /// URL of the uploaded registration document.
    #[serde(default)]
    pub document_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RestaurantApplication {
    pub rest_name: String,
    pub address: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub document_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResult {
    pub id: crate::Identity,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDescriptor {
    pub email: lettre::Address,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResult {
    pub id: crate::Identity,
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ViewProfileResult {
    pub id: crate::Identity,
    /// `None` if the profile has not been provisioned.
    pub profile: Option<super::Profile>,
    pub role: super::Role,
}
