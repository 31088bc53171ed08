//! OpenAPI documentation for the management API, portals, and public pages.

use utoipa::OpenApi;

use crate::api::{handlers, models};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "fieldctl API",
        description = "Multi-tenant field-service management: customers, technicians, crews, \
                       jobs, estimates, invoicing, and customer/technician portals.",
    ),
    paths(
        handlers::auth::login,
        handlers::auth::signup,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::auth::change_password,
        handlers::companies::list_companies,
        handlers::companies::create_company,
        handlers::companies::get_current_company,
        handlers::companies::switch_company,
        handlers::customers::list_customers,
        handlers::customers::create_customer,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::technicians::list_technicians,
        handlers::technicians::create_technician,
        handlers::technicians::get_technician,
        handlers::technicians::update_technician,
        handlers::technicians::delete_technician,
        handlers::crews::list_crews,
        handlers::crews::create_crew,
        handlers::crews::get_crew,
        handlers::crews::update_crew,
        handlers::crews::set_crew_members,
        handlers::crews::delete_crew,
        handlers::jobs::list_jobs,
        handlers::jobs::create_job,
        handlers::jobs::get_job,
        handlers::jobs::update_job,
        handlers::jobs::delete_job,
        handlers::estimates::list_estimates,
        handlers::estimates::create_estimate,
        handlers::estimates::get_estimate,
        handlers::estimates::update_estimate,
        handlers::estimates::send_estimate,
        handlers::estimates::delete_estimate,
        handlers::invoices::list_invoices,
        handlers::invoices::create_invoice,
        handlers::invoices::get_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::delete_invoice,
        handlers::consultations::list_consultations,
        handlers::consultations::create_consultation,
        handlers::consultations::get_consultation,
        handlers::consultations::delete_consultation,
        handlers::api_keys::list_api_keys,
        handlers::api_keys::create_api_key,
        handlers::api_keys::delete_api_key,
        handlers::settings::list_arrival_windows,
        handlers::settings::save_arrival_windows,
        handlers::portal::invite_customer,
        handlers::portal::revoke_customer_access,
        handlers::portal::invite_technician,
        handlers::portal::revoke_technician_access,
        handlers::portal::customer_dashboard,
        handlers::portal::portal_jobs,
        handlers::portal::portal_estimates,
        handlers::portal::portal_invoices,
        handlers::portal::technician_schedule,
        handlers::public::public_estimate,
        handlers::public::sign_public_estimate,
        handlers::public::public_consultation,
    ),
    components(schemas(
        models::auth::LoginRequest,
        models::auth::SignupRequest,
        models::auth::ChangePasswordRequest,
        models::auth::UserResponse,
        models::companies::CompanyCreate,
        models::companies::SwitchCompanyRequest,
        models::companies::CompanyResponse,
        models::customers::CustomerCreate,
        models::customers::CustomerUpdate,
        models::customers::CustomerResponse,
        models::technicians::TechnicianCreate,
        models::technicians::TechnicianUpdate,
        models::technicians::TechnicianResponse,
        models::crews::CrewCreate,
        models::crews::CrewUpdate,
        models::crews::CrewMembersUpdate,
        models::crews::CrewResponse,
        models::jobs::JobCreate,
        models::jobs::JobUpdate,
        models::jobs::JobResponse,
        models::estimates::EstimateCreate,
        models::estimates::EstimateUpdate,
        models::estimates::EstimateSignRequest,
        models::estimates::EstimateResponse,
        models::estimates::PublicEstimateResponse,
        models::invoices::InvoiceCreate,
        models::invoices::InvoiceUpdate,
        models::invoices::InvoiceResponse,
        models::consultations::ConsultationCreate,
        models::consultations::ConsultationResponse,
        models::consultations::PublicConsultationResponse,
        models::api_keys::ApiKeyCreate,
        models::api_keys::ApiKeyResponse,
        models::api_keys::ApiKeyInfoResponse,
        models::settings::ArrivalWindowInput,
        models::settings::SaveArrivalWindowsRequest,
        models::settings::ArrivalWindowResponse,
        models::portal::PortalInviteRequest,
        models::portal::PortalInviteResponse,
        models::portal::CustomerDashboardResponse,
        crate::db::models::jobs::JobStatus,
        crate::db::models::estimates::EstimateStatus,
        crate::db::models::invoices::InvoiceStatus,
    )),
    tags(
        (name = "auth", description = "Authentication and session management"),
        (name = "companies", description = "Tenant management and switching"),
        (name = "customers", description = "Customer records"),
        (name = "technicians", description = "Technician records"),
        (name = "crews", description = "Crews and crew membership"),
        (name = "jobs", description = "Scheduled work"),
        (name = "estimates", description = "Estimates and approvals"),
        (name = "invoices", description = "Billing"),
        (name = "consultations", description = "Video consultations"),
        (name = "settings", description = "Company settings and API keys"),
        (name = "portal", description = "Customer and technician portals"),
        (name = "public", description = "Token-addressed public pages"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_doc_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("spec serializes");
        assert!(json.contains("/customers/{id}"));
        assert!(json.contains("/p/estimates/{token}"));
    }
}
