//! Placeholder Pages
//!
//! Minimal server-rendered pages. They exist so the route guard and the
//! session extractors have something to protect; the markup is not the point.

use std::sync::Arc;

use auth::AuthConfig;
use auth::Identity;
use auth::session::{CurrentIdentity, RequireIdentity};
use axum::Router;
use axum::response::Html;
use axum::routing::get;

pub fn router() -> Router<Arc<AuthConfig>> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/signin", get(sign_in))
        .route("/signup", get(sign_up))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/{*rest}", get(dashboard))
        .route("/profile", get(profile))
        .route("/data", get(data))
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"ja\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    ))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn greeting(identity: &Identity) -> String {
    format!(
        "<p>ようこそ、{} さん</p>",
        escape_html(identity.display_label())
    )
}

async fn home(CurrentIdentity(identity): CurrentIdentity) -> Html<String> {
    let body = match identity {
        Some(identity) => format!("{}<a href=\"/dashboard\">ダッシュボード</a>", greeting(&identity)),
        None => "<a href=\"/signin\">サインイン</a> / <a href=\"/signup\">新規登録</a>".to_string(),
    };
    layout("ホーム", &body)
}

async fn about() -> Html<String> {
    layout("このサイトについて", "<p>社内管理アプリケーション</p>")
}

async fn sign_in() -> Html<String> {
    layout(
        "サインイン",
        "<form id=\"signin\">\n\
         <input name=\"email\" type=\"email\" placeholder=\"メールアドレス\" required>\n\
         <input name=\"password\" type=\"password\" placeholder=\"パスワード\" minlength=\"8\" required>\n\
         <button type=\"submit\">サインイン</button>\n\
         </form>",
    )
}

async fn sign_up() -> Html<String> {
    layout(
        "新規登録",
        "<form id=\"signup\">\n\
         <input name=\"name\" placeholder=\"名前\" required>\n\
         <input name=\"email\" type=\"email\" placeholder=\"メールアドレス\" required>\n\
         <input name=\"password\" type=\"password\" placeholder=\"パスワード\" minlength=\"8\" required>\n\
         <button type=\"submit\">登録</button>\n\
         </form>",
    )
}

async fn dashboard(RequireIdentity(identity): RequireIdentity) -> Html<String> {
    layout("ダッシュボード", &greeting(&identity))
}

async fn profile(RequireIdentity(identity): RequireIdentity) -> Html<String> {
    let body = format!(
        "<dl><dt>名前</dt><dd>{}</dd><dt>メールアドレス</dt><dd>{}</dd></dl>",
        escape_html(identity.name.as_deref().unwrap_or("-")),
        escape_html(&identity.email)
    );
    layout("プロフィール", &body)
}

async fn data(RequireIdentity(identity): RequireIdentity) -> Html<String> {
    layout("データ", &greeting(&identity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x')</script> & \"q\""),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;q&quot;"
        );
        assert_eq!(escape_html("山田 太郎"), "山田 太郎");
    }
}
