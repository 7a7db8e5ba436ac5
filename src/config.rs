#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Payment gateway configuration
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub razorpay_api_url: String,
    // Seed value for the settings singleton; admins change it at runtime
    pub default_commission_rate: f64,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let redis_url = std::env::var("REDIS_URL").ok();

        let razorpay_key_id = std::env::var("RAZORPAY_KEY_ID")
            .unwrap_or_else(|_| "rzp_test_key".to_string());
        let razorpay_key_secret = std::env::var("RAZORPAY_KEY_SECRET")
            .unwrap_or_else(|_| "test_secret_key".to_string());
        let razorpay_api_url = std::env::var("RAZORPAY_API_URL")
            .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string());

        let default_commission_rate = std::env::var("DEFAULT_COMMISSION_RATE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(10.0);

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8000);

        Config {
            database_url,
            redis_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port,
            razorpay_key_id,
            razorpay_key_secret,
            razorpay_api_url,
            default_commission_rate,
        }
    }
}
