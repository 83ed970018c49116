//! Tests for `HttpRequest` and `HttpResponse`.

use super::*;

fn url() -> url::Url {
    url::Url::parse("http://localhost:8080/api/v2/auth/login").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn get_has_no_body_or_headers() {
        let req = HttpRequest::get(url());

        assert_eq!(req.method, http::Method::GET);
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn post_sets_method() {
        assert_eq!(HttpRequest::post(url()).method, http::Method::POST);
    }

    #[test]
    fn with_cookie_replaces_previous_cookie() {
        let req = HttpRequest::get(url())
            .with_cookie(http::HeaderValue::from_static("SID=old"))
            .with_cookie(http::HeaderValue::from_static("SID=new"));

        assert_eq!(req.headers.get_all(http::header::COOKIE).iter().count(), 1);
        assert_eq!(req.headers.get(http::header::COOKIE).unwrap(), "SID=new");
    }

    #[test]
    fn with_form_encodes_fields_and_sets_content_type() {
        let req = HttpRequest::post(url()).with_form([("username", "admin"), ("password", "p&ss w")]);

        assert_eq!(
            req.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(req.body.unwrap(), b"username=admin&password=p%26ss+w".to_vec());
    }
}

mod http_response {
    use super::*;

    #[test]
    fn is_success_only_for_2xx() {
        let ok = HttpResponse::new(http::StatusCode::NO_CONTENT, http::HeaderMap::new(), vec![]);
        let redirect = HttpResponse::new(http::StatusCode::FOUND, http::HeaderMap::new(), vec![]);
        let missing = HttpResponse::new(http::StatusCode::NOT_FOUND, http::HeaderMap::new(), vec![]);

        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!missing.is_success());
    }

    #[test]
    fn text_rejects_invalid_utf8() {
        let text = HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), b"Ok.".to_vec());
        let binary = HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), vec![0xff, 0xfe]);

        assert_eq!(text.text(), Some("Ok."));
        assert_eq!(binary.text(), None);
    }

    fn with_cookies(values: &[&'static str]) -> HttpResponse {
        let mut headers = http::HeaderMap::new();
        for value in values {
            headers.append(http::header::SET_COOKIE, http::HeaderValue::from_static(value));
        }
        HttpResponse::new(http::StatusCode::OK, headers, vec![])
    }

    #[test]
    fn cookie_strips_attributes() {
        let resp = with_cookies(&["SID=abc123; HttpOnly; path=/"]);

        assert_eq!(resp.cookie("SID").unwrap(), "SID=abc123");
    }

    #[test]
    fn cookie_matches_whole_name() {
        let resp = with_cookies(&["SIDX=wrong", "lang=en", "SID=right"]);

        assert_eq!(resp.cookie("SID").unwrap(), "SID=right");
        assert!(resp.cookie("QBT").is_none());
    }
}
