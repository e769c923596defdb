use commutecal::components::google_calendar::token::{TokenManager, TokenResponse, GOOGLE_TOKEN_URL};
use commutecal::config::Config;
use commutecal::error::{other_error, CommuteResult};
use url::Url;

const REDIRECT_URI: &str = "http://localhost:8080";
const LISTEN_ADDR: &str = "127.0.0.1:8080";

const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/calendar.events.owned",
    "https://www.googleapis.com/auth/calendar.events.readonly",
];

#[tokio::main]
async fn main() -> CommuteResult<()> {
    // Load configuration
    let config = Config::load()?;

    let token_manager = TokenManager::new(
        config.token_path.clone(),
        &config.google_client_id,
        &config.google_client_secret,
    );

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let mut auth_url = Url::parse("https://accounts.google.com/o/oauth2/v2/auth")
        .map_err(|e| other_error(&format!("Failed to parse URL: {}", e)))?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", &config.google_client_id)
        .append_pair("redirect_uri", REDIRECT_URI)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", &SCOPES.join(" "))
        .append_pair("state", &state);

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser. Visit this URL to continue:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http(LISTEN_ADDR)
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server.recv()?;
    let callback = Url::parse(&format!("{}{}", REDIRECT_URI, request.url()))
        .map_err(|e| other_error(&format!("Invalid callback URL: {}", e)))?;

    let param = |name: &str| {
        callback
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if param("state").as_deref() != Some(state.as_str()) {
        request.respond(tiny_http::Response::from_string("Authorization failed: state mismatch."))?;
        return Err(other_error("OAuth state mismatch in callback"));
    }
    let code = param("code").ok_or_else(|| other_error("No authorization code found in callback"))?;

    // Exchange code for tokens
    let client = reqwest::Client::new();
    let response = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("client_id", config.google_client_id.as_str()),
            ("client_secret", config.google_client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        request.respond(tiny_http::Response::from_string("Authorization failed."))?;
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let token: TokenResponse = response.json().await?;
    if token.refresh_token.is_none() {
        println!("Warning: no refresh token returned; you will need to re-run this tool when the token expires.");
    }
    token_manager.save(&token.into_stored(None)).await?;

    // Send success response to browser
    request.respond(tiny_http::Response::from_string(
        "Authorization successful! You can close this window.",
    ))?;

    println!("Token successfully saved to {}!", token_manager.path().display());

    Ok(())
}
