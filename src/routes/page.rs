use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Fan Control Status</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
      body { margin: 0; font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; }
      header { display: flex; align-items: baseline; gap: 12px; padding: 16px 24px; border-bottom: 1px solid #1e293b; }
      h1 { margin: 0; font-size: 1.3rem; }
      #updated { color: #64748b; font-size: 0.85rem; }
      main { padding: 16px 24px; display: grid; gap: 24px; }
      section h2 { margin: 0 0 8px; font-size: 1rem; color: #94a3b8; }
      .chart-container { position: relative; height: 260px; width: 100%; background: #111c33; border: 1px solid #1e293b; border-radius: 6px; padding: 8px; box-sizing: border-box; }
    </style>
  </head>
  <body>
    <header>
      <h1>Fan Control Status</h1>
      <span id="updated"></span>
    </header>
    <main>
      <section>
        <h2>Temperatures</h2>
        <div class="chart-container"><canvas id="chart-temperatures"></canvas></div>
      </section>
      <section>
        <h2>Fan Power</h2>
        <div class="chart-container"><canvas id="chart-fan-power"></canvas></div>
      </section>
      <section>
        <h2>Fan RPM</h2>
        <div class="chart-container"><canvas id="chart-fan-rpm"></canvas></div>
      </section>
    </main>
    <script>
      const charts = {};

      function lineChart(canvasId) {
        return new Chart(document.getElementById(canvasId), {
          type: 'line',
          data: { labels: [], datasets: [] },
          options: {
            animation: false,
            responsive: true,
            maintainAspectRatio: false,
            interaction: { mode: 'nearest', intersect: false },
            plugins: { legend: { labels: { color: '#e2e8f0', boxWidth: 12 } } },
            scales: {
              x: { ticks: { color: '#94a3b8', maxTicksLimit: 8, maxRotation: 0 }, grid: { color: '#1e293b' } },
              y: { ticks: { color: '#94a3b8' }, grid: { color: '#1e293b' } }
            }
          }
        });
      }

      function apply(chart, seriesList) {
        chart.data.labels = seriesList.length ? seriesList[0].x : [];
        chart.data.datasets = seriesList.map((series) => ({
          label: series.name,
          data: series.y,
          borderColor: series.color,
          backgroundColor: series.color,
          borderWidth: 1.5,
          pointRadius: 0,
          tension: 0.2
        }));
        chart.update('none');
      }

      function render(snapshot) {
        apply(charts.temperatures, snapshot.temperatures);
        apply(charts.fanPower, snapshot.fan_power);
        apply(charts.fanRpm, snapshot.fan_rpm);
        document.getElementById('updated').innerText = 'updated ' + snapshot.generated_at;
      }

      window.addEventListener('DOMContentLoaded', () => {
        charts.temperatures = lineChart('chart-temperatures');
        charts.fanPower = lineChart('chart-fan-power');
        charts.fanRpm = lineChart('chart-fan-rpm');

        fetch('/api/dashboard/state')
          .then((res) => res.json())
          .then(render)
          .catch(console.error);

        const source = new EventSource('/api/dashboard/live');
        source.onmessage = (event) => render(JSON.parse(event.data));
      });
    </script>
  </body>
</html>
"#;

pub(crate) async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index_handler))
}
