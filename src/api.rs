use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{FetchError, FetchResult};
use crate::source::CharacterSource;
use crate::types::{Character, CharacterStatus, Locator, Page};

#[derive(Debug)]
pub struct CharacterApi {
    client: Client,
    base: String,
}

impl CharacterApi {
    pub fn new(base: String) -> Self {
        Self {
            client: Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> FetchResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Unexpected(status.as_u16()));
        }

        response.json().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Decode(e.to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        })
    }
}

// Directory API response types

#[derive(Deserialize)]
struct ApiPage {
    info: ApiInfo,
    results: Vec<ApiCharacter>,
}

#[derive(Deserialize)]
struct ApiInfo {
    count: Option<u64>,
    next: Option<String>,
}

#[derive(Deserialize)]
struct ApiCharacter {
    id: u64,
    name: String,
    status: Option<String>,
    species: Option<String>,
    gender: Option<String>,
    image: Option<String>,
    origin: Option<ApiPlace>,
    location: Option<ApiPlace>,
    created: Option<String>,
}

#[derive(Deserialize)]
struct ApiPlace {
    name: String,
}

fn parse_status(s: &str) -> CharacterStatus {
    match s.to_ascii_lowercase().as_str() {
        "alive" => CharacterStatus::Alive,
        "dead" => CharacterStatus::Dead,
        _ => CharacterStatus::Unknown,
    }
}

fn parse_datetime(s: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&chrono::Utc))
        .unwrap_or_else(|_| chrono::Utc::now())
}

fn parse_optional_datetime(s: Option<&str>) -> chrono::DateTime<chrono::Utc> {
    s.map(parse_datetime).unwrap_or_else(chrono::Utc::now)
}

fn into_character(c: ApiCharacter) -> Character {
    Character {
        id: c.id,
        name: c.name,
        status: parse_status(c.status.as_deref().unwrap_or("")),
        species: c.species.unwrap_or_else(|| "unknown".to_string()),
        gender: c.gender.unwrap_or_else(|| "unknown".to_string()),
        image: c.image.unwrap_or_default(),
        origin: c
            .origin
            .map(|p| p.name)
            .unwrap_or_else(|| "unknown".to_string()),
        location: c
            .location
            .map(|p| p.name)
            .unwrap_or_else(|| "unknown".to_string()),
        created: parse_optional_datetime(c.created.as_deref()),
    }
}

#[async_trait]
impl CharacterSource for CharacterApi {
    fn first_page(&self, query: &str) -> Locator {
        if query.is_empty() {
            Locator::new(self.base.clone())
        } else {
            Locator::new(format!(
                "{}?name={}",
                self.base,
                urlencoding::encode(query)
            ))
        }
    }

    async fn fetch_page(&self, locator: &Locator) -> FetchResult<Page> {
        let page: ApiPage = match self.get_json(locator.as_str()).await {
            Ok(page) => page,
            // The directory answers a filter with no matches as a not-found.
            // For the list that is an ordinary empty terminal page.
            Err(FetchError::Unexpected(404)) => {
                return Ok(Page {
                    characters: Vec::new(),
                    next: None,
                    total: Some(0),
                })
            }
            Err(e) => return Err(e),
        };

        Ok(Page {
            characters: page.results.into_iter().map(into_character).collect(),
            next: page.info.next.map(Locator::new),
            total: page.info.count,
        })
    }

    async fn fetch_character(&self, id: u64) -> FetchResult<Character> {
        let url = format!("{}/{}", self.base, id);
        let character: ApiCharacter = self.get_json(&url).await?;
        Ok(into_character(character))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn character_json(id: u64, name: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "status": status,
            "species": "Human",
            "type": "",
            "gender": "Male",
            "origin": { "name": "Earth (C-137)", "url": "" },
            "location": { "name": "Citadel of Ricks", "url": "" },
            "image": format!("https://example.test/avatar/{}.jpeg", id),
            "episode": [],
            "url": "",
            "created": "2017-11-04T18:48:46.250Z"
        })
    }

    fn api_for(server: &MockServer) -> CharacterApi {
        CharacterApi::new(format!("{}/api/character", server.uri()))
    }

    #[test]
    fn first_page_without_query_is_the_bare_collection() {
        let api = CharacterApi::new("https://example.test/api/character".to_string());
        assert_eq!(
            api.first_page("").as_str(),
            "https://example.test/api/character"
        );
    }

    #[test]
    fn first_page_encodes_the_name_filter() {
        let api = CharacterApi::new("https://example.test/api/character".to_string());
        assert_eq!(
            api.first_page("rick sanchez").as_str(),
            "https://example.test/api/character?name=rick%20sanchez"
        );
    }

    #[test]
    fn trailing_slash_on_the_base_is_ignored() {
        let api = CharacterApi::new("https://example.test/api/character/".to_string());
        assert_eq!(
            api.first_page("").as_str(),
            "https://example.test/api/character"
        );
    }

    #[test]
    fn status_strings_map_case_insensitively() {
        assert_eq!(parse_status("Alive"), CharacterStatus::Alive);
        assert_eq!(parse_status("dead"), CharacterStatus::Dead);
        assert_eq!(parse_status("unknown"), CharacterStatus::Unknown);
        assert_eq!(parse_status("presumed dead"), CharacterStatus::Unknown);
        assert_eq!(parse_status(""), CharacterStatus::Unknown);
    }

    #[tokio::test]
    async fn fetch_page_decodes_results_and_next() {
        let server = MockServer::start().await;
        let next_url = format!("{}/api/character?page=2", server.uri());

        Mock::given(method("GET"))
            .and(path("/api/character"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "info": { "count": 826, "pages": 42, "next": next_url, "prev": null },
                "results": [
                    character_json(1, "Rick Sanchez", "Alive"),
                    character_json(2, "Morty Smith", "unknown"),
                ]
            })))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let page = api.fetch_page(&api.first_page("")).await.unwrap();

        assert_eq!(page.characters.len(), 2);
        assert_eq!(page.characters[0].name, "Rick Sanchez");
        assert_eq!(page.characters[0].status, CharacterStatus::Alive);
        assert_eq!(page.characters[0].origin, "Earth (C-137)");
        assert_eq!(page.characters[1].status, CharacterStatus::Unknown);
        assert_eq!(page.next, Some(Locator::new(next_url)));
        assert_eq!(page.total, Some(826));
    }

    #[tokio::test]
    async fn fetch_page_follows_an_opaque_next_locator() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/character"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "info": { "count": 826, "pages": 42, "next": null, "prev": null },
                "results": [character_json(21, "Aqua Morty", "unknown")]
            })))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let locator = Locator::new(format!("{}/api/character?page=2", server.uri()));
        let page = api.fetch_page(&locator).await.unwrap();

        assert_eq!(page.characters[0].id, 21);
        assert_eq!(page.next, None);
    }

    #[tokio::test]
    async fn collection_not_found_is_an_empty_terminal_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/character"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "error": "There is nothing here" })),
            )
            .mount(&server)
            .await;

        let api = api_for(&server);
        let page = api
            .fetch_page(&api.first_page("no such character"))
            .await
            .unwrap();

        assert_eq!(
            page,
            Page {
                characters: Vec::new(),
                next: None,
                total: Some(0),
            }
        );
    }

    #[tokio::test]
    async fn server_error_is_surfaced_with_its_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/character"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let err = api.fetch_page(&api.first_page("")).await.unwrap_err();

        assert_eq!(err, FetchError::Unexpected(500));
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/character"))
            .respond_with(ResponseTemplate::new(200).set_body_string("wubba lubba dub dub"))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let err = api.fetch_page(&api.first_page("")).await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let api = CharacterApi::new("http://127.0.0.1:1/api/character".to_string());
        let err = api.fetch_page(&api.first_page("")).await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn fetch_character_decodes_the_detail_record() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/character/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(character_json(1, "Rick Sanchez", "Alive")),
            )
            .mount(&server)
            .await;

        let api = api_for(&server);
        let character = api.fetch_character(1).await.unwrap();

        assert_eq!(character.id, 1);
        assert_eq!(character.name, "Rick Sanchez");
        assert_eq!(character.species, "Human");
        assert_eq!(character.location, "Citadel of Ricks");
        assert_eq!(
            character.created,
            DateTime::parse_from_rfc3339("2017-11-04T18:48:46.250Z")
                .unwrap()
                .with_timezone(&Utc)
        );
    }

    #[tokio::test]
    async fn missing_character_stays_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/character/999999"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "error": "Character not found" })),
            )
            .mount(&server)
            .await;

        let api = api_for(&server);
        let err = api.fetch_character(999999).await.unwrap_err();

        assert_eq!(err, FetchError::Unexpected(404));
    }
}
