use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A film in the upstream catalogue's own shape.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Film {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title_romanised: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rt_score: Option<String>,
    /// Fields the real catalogue also sends that clients ignore.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

pub const CASTLE_IN_THE_SKY: &str = "2baf70d1-42bb-4437-b551-e5fed5a87abe";
pub const MY_NEIGHBOR_TOTORO: &str = "58611129-2dbc-4a81-a72f-77ddfc1b1b49";
pub const SPIRITED_AWAY: &str = "dc2e6bd1-8156-4886-adff-b39e6043af0c";
pub const PRINCESS_MONONOKE: &str = "0440483e-ca0e-4120-8c50-4c8cd9b965d6";
pub const HOWLS_MOVING_CASTLE: &str = "cd3d059c-09f4-4ff3-8d63-bc765a5184fa";

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    title: &str,
    original_title: &str,
    romanised: &str,
    director: &str,
    producer: &str,
    release_date: &str,
    running_time: &str,
    rt_score: &str,
) -> Film {
    Film {
        id: id.to_string(),
        title: title.to_string(),
        original_title: Some(original_title.to_string()),
        original_title_romanised: Some(romanised.to_string()),
        image: Some(format!("https://images.example.test/{id}/poster.jpg")),
        movie_banner: Some(format!("https://images.example.test/{id}/banner.jpg")),
        description: Some(format!("{title}, a Studio Ghibli film.")),
        director: Some(director.to_string()),
        producer: Some(producer.to_string()),
        release_date: Some(release_date.to_string()),
        running_time: Some(running_time.to_string()),
        rt_score: Some(rt_score.to_string()),
        extra: HashMap::new(),
    }
}

/// The five films the default app serves.
///
/// Castle in the Sky carries the extra fields the real catalogue sends;
/// Howl's Moving Castle has an empty description and no banner.
pub fn seed_films() -> Vec<Film> {
    let mut castle = seed(
        CASTLE_IN_THE_SKY,
        "Castle in the Sky",
        "天空の城ラピュタ",
        "Tenkū no shiro Rapyuta",
        "Hayao Miyazaki",
        "Isao Takahata",
        "1986",
        "124",
        "95",
    );
    castle.extra.insert("people".to_string(), json!(["https://ghibliapi.vercel.app/people/"]));
    castle.extra.insert(
        "url".to_string(),
        json!(format!("https://ghibliapi.vercel.app/films/{CASTLE_IN_THE_SKY}")),
    );

    let mut howl = seed(
        HOWLS_MOVING_CASTLE,
        "Howl's Moving Castle",
        "ハウルの動く城",
        "Hauru no Ugoku Shiro",
        "Hayao Miyazaki",
        "Toshio Suzuki",
        "2004",
        "119",
        "87",
    );
    howl.description = Some(String::new());
    howl.movie_banner = None;

    vec![
        castle,
        seed(
            MY_NEIGHBOR_TOTORO,
            "My Neighbor Totoro",
            "となりのトトロ",
            "Tonari no Totoro",
            "Hayao Miyazaki",
            "Hayao Miyazaki",
            "1988",
            "86",
            "93",
        ),
        seed(
            SPIRITED_AWAY,
            "Spirited Away",
            "千と千尋の神隠し",
            "Sen to Chihiro no kamikakushi",
            "Hayao Miyazaki",
            "Toshio Suzuki",
            "2001",
            "124",
            "97",
        ),
        seed(
            PRINCESS_MONONOKE,
            "Princess Mononoke",
            "もののけ姫",
            "Mononoke hime",
            "Hayao Miyazaki",
            "Toshio Suzuki",
            "1997",
            "134",
            "92",
        ),
        howl,
    ]
}

/// Films in insertion order, keyed by id.
#[derive(Default)]
pub struct Catalogue {
    order: Vec<String>,
    films: HashMap<String, Film>,
}

impl Catalogue {
    pub fn new(films: Vec<Film>) -> Self {
        let mut catalogue = Self::default();
        for film in films {
            if !catalogue.films.contains_key(&film.id) {
                catalogue.order.push(film.id.clone());
            }
            catalogue.films.insert(film.id.clone(), film);
        }
        catalogue
    }

    fn all(&self) -> Vec<Film> {
        self.order
            .iter()
            .filter_map(|id| self.films.get(id))
            .cloned()
            .collect()
    }
}

pub type Db = Arc<Catalogue>;

pub fn app() -> Router {
    app_with(seed_films())
}

pub fn app_with(films: Vec<Film>) -> Router {
    let db: Db = Arc::new(Catalogue::new(films));
    Router::new()
        .route("/films", get(list_films))
        .route("/films/{id}", get(get_film))
        .with_state(db)
}

/// A catalogue that answers every request with `status`. Codes outside
/// 100..=999 become 500.
pub fn failing_app(status: u16) -> Router {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Router::new().fallback(move || async move {
        (
            status,
            Json(json!({ "message": status.canonical_reason().unwrap_or("error") })),
        )
    })
}

/// A catalogue that answers every request with `status` and `body` as raw
/// bytes, whatever they contain.
pub fn raw_app(status: u16, body: Vec<u8>) -> Router {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Router::new().fallback(move || {
        let body = body.clone();
        async move { (status, body) }
    })
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_app(listener, app()).await
}

pub async fn run_app(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// Serve `app` on a random local port from a background thread and return
/// its address.
pub fn spawn_background(app: Router) -> std::io::Result<SocketAddr> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || -> std::io::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        rt.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            run_app(listener, app).await
        })
    });
    Ok(addr)
}

async fn list_films(State(db): State<Db>) -> Json<Vec<Film>> {
    Json(db.all())
}

async fn get_film(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Film>, StatusCode> {
    db.films.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn film_serializes_snake_case_and_skips_absent() {
        let film = Film {
            id: "x".to_string(),
            title: "Test".to_string(),
            release_date: Some("1992".to_string()),
            ..Film::default()
        };
        let json = serde_json::to_value(&film).unwrap();
        assert_eq!(json["id"], "x");
        assert_eq!(json["release_date"], "1992");
        assert!(json.get("rt_score").is_none());
    }

    #[test]
    fn extra_fields_are_flattened() {
        let castle = seed_films().into_iter().next().unwrap();
        let json = serde_json::to_value(&castle).unwrap();
        assert!(json["people"].is_array());
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn seeds_have_unique_ids() {
        let catalogue = Catalogue::new(seed_films());
        assert_eq!(catalogue.all().len(), 5);
    }

    #[test]
    fn catalogue_keeps_insertion_order_and_last_duplicate() {
        let a = Film {
            id: "a".to_string(),
            title: "A".to_string(),
            ..Film::default()
        };
        let b = Film {
            id: "b".to_string(),
            title: "B".to_string(),
            ..Film::default()
        };
        let a2 = Film {
            title: "A again".to_string(),
            ..a.clone()
        };
        let all = Catalogue::new(vec![a, b, a2]).all();
        assert_eq!(all.iter().map(|f| f.title.as_str()).collect::<Vec<_>>(), ["A again", "B"]);
    }
}
