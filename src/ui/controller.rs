use crate::{
    client::ApiClient,
    models::{MovieId, RecommendationItem, ViewRecord, DEFAULT_TOP_K},
    ui::{
        charts::{self, ChartBackend, ChartRegistry, ChartSlot},
        page::{Page, SUBMIT_BUSY, SUBMIT_IDLE},
        render,
    },
};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a keyword.";
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear all history?";

/// Reads the result-count field the way a number input is coerced:
/// blank, zero and non-numeric input fall back to the default
pub fn parse_top_k(raw: &str) -> i64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value.trunc() as i64,
        _ => DEFAULT_TOP_K,
    }
}

/// Drives the page: one method per user event.
///
/// Remote failures never escape; they are written to the error region
/// (recommendations) or logged and swallowed (dashboard and history).
pub struct UiController<C, P, B: ChartBackend> {
    client: C,
    page: P,
    charts: ChartRegistry<B>,
    results: Vec<RecommendationItem>,
}

impl<C, P, B> UiController<C, P, B>
where
    C: ApiClient,
    P: Page,
    B: ChartBackend,
{
    pub fn new(client: C, page: P, backend: B) -> Self {
        Self {
            client,
            page,
            charts: ChartRegistry::new(backend),
            results: Vec::new(),
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn charts(&self) -> &ChartRegistry<B> {
        &self.charts
    }

    /// Items behind the rows currently shown
    pub fn results(&self) -> &[RecommendationItem] {
        &self.results
    }

    /// Initial page load
    pub async fn init(&mut self) {
        self.load_stats().await;
        self.load_history().await;
    }

    /// Recommend button / Enter in the query field
    pub async fn recommend(&mut self) {
        self.page.set_error("");
        self.results.clear();
        self.page.set_results(String::new());

        let query = self.page.query_value().trim().to_string();
        if query.is_empty() {
            self.page.set_error(EMPTY_QUERY_MESSAGE);
            return;
        }
        let top_k = parse_top_k(&self.page.top_k_value());

        self.page.set_submit(SUBMIT_BUSY);
        match self.client.recommend(&query, top_k).await {
            Ok(items) => {
                self.page.set_results(render::results(&items));
                self.results = items;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation request failed");
                self.page.set_error(&e.user_message());
            }
        }
        self.page.set_submit(SUBMIT_IDLE);
    }

    /// Click on a result row; returns false when no row has that index
    pub async fn open_result(&mut self, index: usize) -> bool {
        let Some(item) = self.results.get(index) else {
            return false;
        };
        let view = ViewRecord {
            movie_id: MovieId::Number(item.id),
            title: item.title.clone(),
            genres: Some(item.genres.clone()),
            rating: Some(item.rating),
        };
        self.save_view(&view).await;
        true
    }

    pub async fn save_view(&mut self, view: &ViewRecord) {
        if let Err(e) = self.client.record_view(view).await {
            tracing::warn!(error = %e, "Failed to record view");
            return;
        }
        self.load_history().await;
    }

    /// Fetches the stats and redraws the three charts and the heatmap
    pub async fn load_stats(&mut self) {
        let stats = match self.client.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load stats");
                return;
            }
        };

        self.charts
            .render(ChartSlot::Rating, &charts::rating_chart(&stats));
        self.charts
            .render(ChartSlot::Genre, &charts::genre_chart(&stats));
        self.charts
            .render(ChartSlot::TopItems, &charts::top_items_chart(&stats));
        self.page
            .set_heatmap(render::heatmap(stats.heatmap.as_ref()));
    }

    pub async fn load_history(&mut self) {
        match self.client.history().await {
            Ok(history) => {
                self.page
                    .set_search_history(render::search_history(&history.searches));
                self.page
                    .set_view_history(render::view_history(&history.views));
            }
            Err(e) => tracing::warn!(error = %e, "Failed to load history"),
        }
    }

    /// Clear-history button; does nothing unless the user confirms
    pub async fn clear_history(&mut self) {
        if !self.page.confirm(CLEAR_PROMPT) {
            return;
        }
        if let Err(e) = self.client.clear_history().await {
            tracing::warn!(error = %e, "Failed to clear history");
            return;
        }
        self.load_history().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::{ClientError, MockApiClient},
        models::{
            GenreCounts, Heatmap, HistorySnapshot, RatingDistribution, StatsSnapshot, TopItems,
        },
        ui::{
            charts::MemoryChartBackend,
            page::{HtmlPage, SubmitState},
        },
    };
    use mockall::predicate::eq;

    fn item(id: i64, title: &str) -> RecommendationItem {
        RecommendationItem {
            id,
            title: title.to_string(),
            genres: "Sci-Fi".to_string(),
            rating: 8.0,
            overview: None,
            release_date: None,
            year: Some(2001),
            score: 0.5,
        }
    }

    fn stats() -> StatsSnapshot {
        StatsSnapshot {
            rating_distribution: RatingDistribution {
                bins: vec![0.0, 5.0, 10.0],
                counts: vec![1, 1],
            },
            genre_counts: GenreCounts {
                labels: vec!["Sci-Fi".to_string()],
                counts: vec![2],
            },
            top_items: TopItems {
                titles: vec!["Alien".to_string()],
                ratings: vec![8.5],
            },
            heatmap: Some(Heatmap {
                labels: vec!["Sci-Fi".to_string()],
                matrix: vec![vec![1.0]],
            }),
        }
    }

    fn controller(
        client: MockApiClient,
        page: HtmlPage,
    ) -> (UiController<MockApiClient, HtmlPage, MemoryChartBackend>, MemoryChartBackend) {
        let backend = MemoryChartBackend::default();
        (UiController::new(client, page, backend.clone()), backend)
    }

    #[test]
    fn test_parse_top_k() {
        assert_eq!(parse_top_k("5"), 5);
        assert_eq!(parse_top_k(" 3.7 "), 3);
        assert_eq!(parse_top_k(""), DEFAULT_TOP_K);
        assert_eq!(parse_top_k("0"), DEFAULT_TOP_K);
        assert_eq!(parse_top_k("ten"), DEFAULT_TOP_K);
        assert_eq!(parse_top_k("inf"), DEFAULT_TOP_K);
        assert_eq!(parse_top_k("-2"), -2);
    }

    #[tokio::test]
    async fn test_blank_query_never_reaches_the_server() {
        let mut client = MockApiClient::new();
        client.expect_recommend().times(0);
        client.expect_history().times(0);

        let (mut ui, _) = controller(client, HtmlPage::with_input("   ", "10"));
        ui.recommend().await;

        assert_eq!(ui.page().error, EMPTY_QUERY_MESSAGE);
        assert!(ui.page().submit_log.is_empty());
        assert!(ui.page().results.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_renders_rows_and_restores_button() {
        let mut client = MockApiClient::new();
        client
            .expect_recommend()
            .withf(|query, top_k| query.to_string() == "space" && *top_k == 2)
            .times(1)
            .returning(|_, _| Ok(vec![item(1, "Alien"), item(2, "Moon")]));

        let (mut ui, _) = controller(client, HtmlPage::with_input(" space ", "2"));
        ui.recommend().await;

        let page = ui.page();
        assert_eq!(page.results.matches("class=\"result-item\"").count(), 2);
        assert_eq!(page.error, "");
        assert_eq!(page.submit_log, vec![SUBMIT_BUSY, SUBMIT_IDLE]);
        assert_eq!(
            page.submit,
            SubmitState {
                enabled: true,
                label: "Recommend"
            }
        );
        assert_eq!(ui.results().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_recommend_shows_server_message_and_restores_button() {
        let mut client = MockApiClient::new();
        client.expect_recommend().times(1).returning(|_, _| {
            Err(ClientError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        });

        let (mut ui, _) = controller(client, HtmlPage::with_input("space", "10"));
        ui.recommend().await;

        assert_eq!(ui.page().error, "boom");
        assert_eq!(ui.page().submit, SUBMIT_IDLE);
        assert!(ui.results().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_list_shows_message() {
        let mut client = MockApiClient::new();
        client.expect_recommend().returning(|_, _| Ok(Vec::new()));

        let (mut ui, _) = controller(client, HtmlPage::with_input("zzz", ""));
        ui.recommend().await;

        assert_eq!(ui.page().results, render::NO_RESULTS);
    }

    #[tokio::test]
    async fn test_opening_a_row_records_that_item() {
        let mut client = MockApiClient::new();
        client
            .expect_recommend()
            .returning(|_, _| Ok(vec![item(11, "Alien"), item(22, "Moon")]));
        client
            .expect_record_view()
            .with(eq(ViewRecord {
                movie_id: MovieId::Number(22),
                title: "Moon".to_string(),
                genres: Some("Sci-Fi".to_string()),
                rating: Some(8.0),
            }))
            .times(1)
            .returning(|_| Ok(()));
        client
            .expect_history()
            .times(1)
            .returning(|| Ok(HistorySnapshot::default()));

        let (mut ui, _) = controller(client, HtmlPage::with_input("space", "10"));
        ui.recommend().await;

        assert!(ui.open_result(1).await);
        assert!(!ui.open_result(5).await);
    }

    #[tokio::test]
    async fn test_reloading_stats_keeps_one_chart_per_slot() {
        let mut client = MockApiClient::new();
        client.expect_stats().times(2).returning(|| Ok(stats()));

        let (mut ui, backend) = controller(client, HtmlPage::default());
        ui.load_stats().await;
        ui.load_stats().await;

        assert_eq!(backend.live_count(ChartSlot::Rating), 1);
        assert_eq!(backend.live_count(ChartSlot::Genre), 1);
        assert_eq!(backend.live_count(ChartSlot::TopItems), 1);
        assert_eq!(backend.created(), 6);
        assert_eq!(backend.destroyed(), 3);
        assert!(ui.page().heatmap.contains("heatmap-grid"));
    }

    #[tokio::test]
    async fn test_stats_failure_leaves_page_untouched() {
        let mut client = MockApiClient::new();
        client.expect_stats().returning(|| {
            Err(ClientError::Api {
                status: 500,
                message: "down".to_string(),
            })
        });

        let (mut ui, backend) = controller(client, HtmlPage::default());
        ui.load_stats().await;

        assert_eq!(backend.live_total(), 0);
        assert_eq!(ui.page().error, "");
        assert!(ui.page().heatmap.is_empty());
    }

    #[tokio::test]
    async fn test_clear_history_requires_confirmation() {
        let mut client = MockApiClient::new();
        client.expect_clear_history().times(0);
        client.expect_history().times(0);

        let (mut ui, _) = controller(client, HtmlPage::default());
        ui.clear_history().await;

        assert_eq!(ui.page().prompts, vec![CLEAR_PROMPT.to_string()]);
    }

    #[tokio::test]
    async fn test_confirmed_clear_refreshes_both_lists() {
        let mut client = MockApiClient::new();
        client.expect_clear_history().times(1).returning(|| Ok(()));
        client
            .expect_history()
            .times(1)
            .returning(|| Ok(HistorySnapshot::default()));

        let mut page = HtmlPage::default();
        page.confirm_answer = true;
        let (mut ui, _) = controller(client, page);
        ui.clear_history().await;

        assert_eq!(ui.page().search_history, render::NO_SEARCHES);
        assert_eq!(ui.page().view_history, render::NO_VIEWS);
    }
}
