use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    csv_import::{
        alert::import_success,
        csv::{CsvFile, parse_csv},
        import::import_files,
    },
    timezone::local_today,
};

/// The state needed for importing CSV files.
#[derive(Debug, Clone)]
pub struct ImportState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler for importing accounts, balances and transactions from CSV files.
///
/// Every uploaded file is parsed before anything is saved, and the files are
/// saved in a single database transaction.
pub async fn import_csv_endpoint(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Response {
    let start_time = std::time::Instant::now();
    let mut files: Vec<CsvFile> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                tracing::error!("Could not read multipart form: {error}");
                return Error::MultipartError(error.body_text()).into_alert_response();
            }
        };

        let file_name = field.file_name().unwrap_or_default().to_owned();

        let csv_data = match parse_multipart_field(field).await {
            Ok(csv_data) => csv_data,
            Err(error @ Error::NotCSV) => return error.into_alert_response(),
            Err(error) => {
                tracing::error!("Failed to parse multipart field: {error}");
                return error.into_alert_response();
            }
        };

        match parse_csv(&csv_data) {
            Ok(file) => files.push(file),
            Err(Error::InvalidCSV(details)) => {
                tracing::debug!("Failed to parse CSV file '{file_name}': {details}");
                return Error::InvalidCSV(format!("{file_name}: {details}")).into_alert_response();
            }
            Err(error) => return error.into_alert_response(),
        }
    }

    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match import_files(files, today, &connection) {
        Ok(summary) => (
            StatusCode::CREATED,
            import_success(&summary, start_time.elapsed()).into_html(),
        )
            .into_response(),
        Err(error @ Error::InvalidCSV(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Failed to import CSV files: {error}");
            error.into_alert_response()
        }
    }
}

fn is_csv(field: &Field<'_>) -> bool {
    field.content_type() == Some("text/csv")
        || field
            .file_name()
            .is_some_and(|file_name| file_name.to_lowercase().ends_with(".csv"))
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    if !is_csv(&field) {
        return Err(Error::NotCSV);
    }

    let file_name = match field.file_name() {
        Some(file_name) => file_name.to_owned(),
        None => {
            tracing::error!("Could not get file name from multipart form field: {field:#?}");
            return Err(Error::MultipartError(
                "Could not get file name from multipart form field".to_owned(),
            ));
        }
    };
    let data = match field.text().await {
        Ok(data) => data,
        Err(error) => {
            tracing::error!("Could not read data from multipart form field: {error}");
            return Err(Error::MultipartError(
                "Could not read data from multipart form field.".to_owned(),
            ));
        }
    };

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRequest, Multipart, State},
        http::{Request, StatusCode},
        response::Response,
    };

    use crate::{
        account::get_all_accounts,
        endpoints,
        snapshot::get_monthly_snapshots,
        test_utils::{assert_valid_html, get_test_state, parse_html_fragment, select_texts},
    };

    use super::{ImportState, import_csv_endpoint};

    const ACCOUNTS_CSV: &str = "id,name,bank,category,owner\n\
        a1,Everyday,ANZ,Checking,me\n\
        a2,Car loan,ANZ,Loan,me";
    const BALANCES_CSV: &str = "account_id,date,value\n\
        a1,2024-01-31,1000\n\
        a2,2024-01-31,250";

    fn get_import_state() -> ImportState {
        let state = get_test_state();
        ImportState {
            local_timezone: state.local_timezone,
            db_connection: state.db_connection,
        }
    }

    async fn must_make_multipart(files: &[(&str, &str)]) -> Multipart {
        let boundary = "MY_BOUNDARY123456789";
        let boundary_start = format!("--{boundary}");
        let boundary_end = format!("--{boundary}--");

        let mut lines: Vec<String> = Vec::new();

        for (content_type, contents) in files {
            lines.push(boundary_start.clone());
            lines.push(
                "Content-Disposition: form-data; name=\"files\"; filename=\"export.txt\";"
                    .to_owned(),
            );
            lines.push(format!("Content-Type: {content_type}"));
            lines.push(String::new());
            lines.push((*contents).to_owned());
        }

        lines.push(boundary_end);

        let data = lines.join("\r\n").into_bytes();

        let request = Request::builder()
            .method("POST")
            .uri(endpoints::IMPORT)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(data.into())
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }

    async fn alert_message(response: Response) -> String {
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        select_texts(&html, "#alert-container p.font-semibold").join("")
    }

    #[tokio::test]
    async fn imports_accounts_and_balances() {
        let state = get_import_state();

        let response = import_csv_endpoint(
            State(state.clone()),
            must_make_multipart(&[("text/csv", BALANCES_CSV), ("text/csv", ACCOUNTS_CSV)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            alert_message(response).await,
            "Import completed successfully!"
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_all_accounts(&connection).unwrap().len(), 2);
        let snapshots = get_monthly_snapshots(&connection).unwrap();
        assert_eq!(snapshots[0].net_worth, 750.0);
    }

    #[tokio::test]
    async fn invalid_file_type_renders_error_message() {
        let state = get_import_state();

        let response = import_csv_endpoint(
            State(state),
            must_make_multipart(&[("text/plain", ACCOUNTS_CSV)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(alert_message(response).await, "File type must be CSV.");
    }

    #[tokio::test]
    async fn unrecognised_csv_renders_error_and_imports_nothing() {
        let state = get_import_state();

        let response = import_csv_endpoint(
            State(state.clone()),
            must_make_multipart(&[("text/csv", ACCOUNTS_CSV), ("text/csv", "foo,bar\n1,2")]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(alert_message(response).await, "Failed to parse CSV");
        assert_eq!(
            get_all_accounts(&state.db_connection.lock().unwrap()).unwrap(),
            vec![]
        );
    }

    #[tokio::test]
    async fn unknown_account_renders_error() {
        let state = get_import_state();

        let response = import_csv_endpoint(
            State(state),
            must_make_multipart(&[("text/csv", BALANCES_CSV)]).await,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(alert_message(response).await, "Failed to parse CSV");
    }
}
