pub mod consultation_service;
pub mod dashboard_service;
pub mod payment_service;
pub mod subscription_service;
pub mod view_settings;

pub use consultation_service::ConsultationService;
pub use dashboard_service::DashboardService;
pub use payment_service::PaymentService;
pub use subscription_service::SubscriptionService;
pub use view_settings::ViewSettings;
