//! HTML report generation with D3.js visualizations

use crate::report::Digest;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, digest: &Digest) -> io::Result<()> {
    let json = serde_json::to_string(digest)?;
    // Keep </script> sequences inside game names from closing the tag early
    let json = json.replace("</", "<\\/");

    let html = TEMPLATE.replace("__DIGEST_JSON__", &json);
    writer.write_all(html.as_bytes())
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Vitrine Catalog Report</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        :root {
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --accent: #58a6ff;
            --bar: #90caf9;
            --genre: #a5d6a7;
            --launch: #ab47bc;
            --ratio: #3fb950;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }
        .container { max-width: 1400px; margin: 0 auto; padding: 2rem; }

        .header {
            display: flex;
            align-items: baseline;
            gap: 1rem;
            margin-bottom: 2rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }
        .logo {
            font-size: 2.5rem;
            font-weight: 800;
            background: linear-gradient(135deg, var(--accent), #a371f7);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
        }
        .subtitle { color: var(--dim); font-size: 0.95rem; }

        .stats {
            display: grid;
            grid-template-columns: repeat(4, 1fr);
            gap: 1rem;
            margin-bottom: 2rem;
        }
        .stat {
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
            text-align: center;
        }
        .stat-value { font-size: 2.5rem; font-weight: 700; line-height: 1; }
        .stat-label { color: var(--dim); font-size: 0.875rem; text-transform: uppercase; letter-spacing: 0.05em; margin-top: 0.5rem; }

        .charts { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
        .chart-card {
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
        }
        .chart-card.wide { grid-column: 1 / -1; }
        .chart-title { font-size: 1rem; font-weight: 600; margin-bottom: 1rem; color: var(--dim); }
        .chart-note { color: var(--dim); font-size: 0.8rem; font-style: italic; margin-top: 0.5rem; }
        .chart-empty { color: var(--dim); font-style: italic; padding: 2rem 0; text-align: center; }
        .chart-error { color: #d29922; padding: 2rem 0; text-align: center; }
        .stat-inline { font-size: 1.75rem; font-weight: 700; color: var(--accent); }

        .tooltip {
            position: absolute;
            background: #1c2128;
            border: 1px solid var(--border);
            border-radius: 6px;
            padding: 0.4rem 0.6rem;
            font-size: 0.8rem;
            pointer-events: none;
            opacity: 0;
            transition: opacity 0.1s;
            z-index: 10;
        }
        .tooltip.visible { opacity: 1; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <div class="logo">Vitrine</div>
            <div class="subtitle" id="report-meta"></div>
        </div>

        <div class="stats">
            <div class="stat"><div class="stat-value" id="stat-total"></div><div class="stat-label">Games</div></div>
            <div class="stat"><div class="stat-value" id="stat-paid"></div><div class="stat-label">Paid</div></div>
            <div class="stat"><div class="stat-value" id="stat-free"></div><div class="stat-label">Free</div></div>
            <div class="stat"><div class="stat-value" id="stat-undated"></div><div class="stat-label">Unknown date</div></div>
        </div>

        <div class="charts">
            <div class="chart-card wide">
                <div class="chart-title">Top 10 Most Reviewed</div>
                <div id="top-reviewed"></div>
            </div>
            <div class="chart-card">
                <div class="chart-title" id="histogram-title">Price Distribution</div>
                <div id="price-histogram"></div>
            </div>
            <div class="chart-card">
                <div class="chart-title">Top 10 Genres (primary)</div>
                <div id="top-genres"></div>
            </div>
            <div class="chart-card wide">
                <div class="chart-title">Launch Evolution by Semester</div>
                <div id="launch-evolution"></div>
                <div class="chart-note" id="launch-note"></div>
            </div>
            <div class="chart-card wide">
                <div class="chart-title">Price vs Review Count &middot; Pearson r = <span class="stat-inline" id="pearson-r"></span></div>
                <div id="correlation"></div>
            </div>
            <div class="chart-card">
                <div class="chart-title">Best-Rated Genres (mean positive ratio)</div>
                <div id="genre-ratios"></div>
            </div>
            <div class="chart-card">
                <div class="chart-title">Launches by Calendar Month (complete years)</div>
                <div id="seasonality"></div>
            </div>
        </div>
    </div>

    <div class="tooltip" id="tooltip"></div>

    <script>
    const digest = __DIGEST_JSON__;

    const css = getComputedStyle(document.documentElement);
    const color = name => css.getPropertyValue('--' + name).trim();

    document.getElementById('report-meta').textContent =
        `${digest.source} - generated ${digest.generated}`;
    document.getElementById('stat-total').textContent = digest.summary.total;
    document.getElementById('stat-paid').textContent = digest.summary.paid;
    document.getElementById('stat-free').textContent = digest.summary.free;
    document.getElementById('stat-undated').textContent = digest.summary.undated;

    function showTooltip(event, text) {
        const tooltip = document.getElementById('tooltip');
        tooltip.textContent = text;
        tooltip.classList.add('visible');
        tooltip.style.left = (event.pageX + 10) + 'px';
        tooltip.style.top = (event.pageY - 10) + 'px';
    }
    function hideTooltip() {
        document.getElementById('tooltip').classList.remove('visible');
    }

    function markEmpty(id, text) {
        const div = document.createElement('div');
        div.className = 'chart-empty';
        div.textContent = text || 'No data for this view.';
        document.getElementById(id).appendChild(div);
        return true;
    }

    function chartArea(id, heightPx, margin) {
        const container = document.getElementById(id);
        const width = container.clientWidth - margin.left - margin.right;
        const height = heightPx - margin.top - margin.bottom;
        const svg = d3.select(container)
            .append('svg')
            .attr('width', width + margin.left + margin.right)
            .attr('height', height + margin.top + margin.bottom)
            .append('g')
            .attr('transform', `translate(${margin.left},${margin.top})`);
        return { svg, width, height };
    }

    // Top 10 most reviewed: horizontal bars, highest at the top
    function drawTopReviewed() {
        const data = digest.top_reviewed;
        if (!data.length) return markEmpty('top-reviewed');

        const margin = { top: 10, right: 40, bottom: 30, left: 220 };
        const { svg, width, height } = chartArea('top-reviewed', 360, margin);

        const y = d3.scaleBand().domain(data.map(d => d.name)).range([0, height]).padding(0.2);
        const x = d3.scaleLinear().domain([0, d3.max(data, d => d.reviews_total)]).range([0, width]);

        svg.selectAll('rect')
            .data(data)
            .enter()
            .append('rect')
            .attr('y', d => y(d.name))
            .attr('height', y.bandwidth())
            .attr('x', 0)
            .attr('width', d => x(d.reviews_total))
            .attr('rx', 3)
            .attr('fill', color('accent'))
            .on('mouseover', (event, d) => showTooltip(event, `${d.name}: ${d.reviews_total.toLocaleString()} reviews`))
            .on('mouseout', hideTooltip);

        svg.append('g').call(d3.axisLeft(y)).style('color', color('dim'));
        svg.append('g')
            .attr('transform', `translate(0,${height})`)
            .call(d3.axisBottom(x).ticks(5).tickFormat(d3.format('~s')))
            .style('color', color('dim'));
    }

    // Paid price histogram
    function drawPriceHistogram() {
        const histogram = digest.price_histogram;
        document.getElementById('histogram-title').textContent =
            `Price Distribution (paid, up to $${histogram.max_price})`;
        if (!histogram.bins.length) return markEmpty('price-histogram');

        const margin = { top: 10, right: 20, bottom: 40, left: 45 };
        const { svg, width, height } = chartArea('price-histogram', 300, margin);

        const bins = histogram.bins;
        const x = d3.scaleLinear()
            .domain([bins[0].lower, bins[bins.length - 1].upper])
            .range([0, width]);
        const y = d3.scaleLinear().domain([0, d3.max(bins, b => b.count)]).range([height, 0]);

        svg.selectAll('rect')
            .data(bins)
            .enter()
            .append('rect')
            .attr('x', b => x(b.lower))
            .attr('width', b => Math.max(1, x(b.upper) - x(b.lower) - 1))
            .attr('y', b => y(b.count))
            .attr('height', b => height - y(b.count))
            .attr('fill', color('bar'))
            .on('mouseover', (event, b) => showTooltip(event, `$${b.lower.toFixed(2)} - $${b.upper.toFixed(2)}: ${b.count} games`))
            .on('mouseout', hideTooltip);

        svg.append('g')
            .attr('transform', `translate(0,${height})`)
            .call(d3.axisBottom(x).ticks(6).tickFormat(d => '$' + d))
            .style('color', color('dim'));
        svg.append('g').call(d3.axisLeft(y).ticks(5)).style('color', color('dim'));
    }

    // Top primary genres: vertical bars
    function drawTopGenres() {
        const data = digest.top_genres;
        if (!data.length) return markEmpty('top-genres');

        const margin = { top: 10, right: 10, bottom: 70, left: 45 };
        const { svg, width, height } = chartArea('top-genres', 300, margin);

        const x = d3.scaleBand().domain(data.map(d => d.genre)).range([0, width]).padding(0.25);
        const y = d3.scaleLinear().domain([0, d3.max(data, d => d.count)]).range([height, 0]);

        svg.selectAll('rect')
            .data(data)
            .enter()
            .append('rect')
            .attr('x', d => x(d.genre))
            .attr('width', x.bandwidth())
            .attr('y', d => y(d.count))
            .attr('height', d => height - y(d.count))
            .attr('rx', 3)
            .attr('fill', color('genre'))
            .on('mouseover', (event, d) => showTooltip(event, `${d.genre}: ${d.count} games`))
            .on('mouseout', hideTooltip);

        svg.append('g')
            .attr('transform', `translate(0,${height})`)
            .call(d3.axisBottom(x))
            .style('color', color('dim'))
            .selectAll('text')
            .attr('transform', 'rotate(-40)')
            .style('text-anchor', 'end');
        svg.append('g').call(d3.axisLeft(y).ticks(5)).style('color', color('dim'));
    }

    // Semester launch series
    function drawLaunchEvolution() {
        const data = digest.launch_evolution;
        document.getElementById('launch-note').textContent = digest.launch_note;
        if (!data.length) return markEmpty('launch-evolution');

        const margin = { top: 10, right: 20, bottom: 60, left: 55 };
        const { svg, width, height } = chartArea('launch-evolution', 320, margin);

        const x = d3.scalePoint().domain(data.map(d => d.semester)).range([0, width]).padding(0.5);
        const y = d3.scaleLinear().domain([0, d3.max(data, d => d.count)]).range([height, 0]);

        svg.append('path')
            .datum(data)
            .attr('fill', 'none')
            .attr('stroke', color('launch'))
            .attr('stroke-width', 2)
            .attr('d', d3.line().x(d => x(d.semester)).y(d => y(d.count)));

        svg.selectAll('circle')
            .data(data)
            .enter()
            .append('circle')
            .attr('cx', d => x(d.semester))
            .attr('cy', d => y(d.count))
            .attr('r', 4)
            .attr('fill', color('launch'))
            .on('mouseover', (event, d) => showTooltip(event, `${d.semester}: ${d.count} launches`))
            .on('mouseout', hideTooltip);

        svg.append('g')
            .attr('transform', `translate(0,${height})`)
            .call(d3.axisBottom(x))
            .style('color', color('dim'))
            .selectAll('text')
            .attr('transform', 'rotate(-45)')
            .style('text-anchor', 'end');
        svg.append('g').call(d3.axisLeft(y).ticks(6)).style('color', color('dim'));
    }

    // Price/review scatter with trend, log review axis
    function drawCorrelation() {
        const correlation = digest.correlation;
        document.getElementById('pearson-r').textContent =
            correlation.pearson_r === null ? 'n/a' : correlation.pearson_r.toFixed(2);
        if (!correlation.points.length) return markEmpty('correlation');

        const margin = { top: 10, right: 20, bottom: 40, left: 60 };
        const { svg, width, height } = chartArea('correlation', 340, margin);

        const points = correlation.points;
        const x = d3.scaleLinear().domain([0, d3.max(points, p => p.price)]).nice().range([0, width]);
        const y = d3.scaleLog()
            .domain([1, d3.max(points, p => p.reviews_total)])
            .nice()
            .range([height, 0]);

        svg.selectAll('circle')
            .data(points)
            .enter()
            .append('circle')
            .attr('cx', p => x(p.price))
            .attr('cy', p => y(Math.max(1, p.reviews_total)))
            .attr('r', 3)
            .attr('fill', color('accent'))
            .attr('fill-opacity', 0.55)
            .on('mouseover', (event, p) => showTooltip(event, `$${p.price.toFixed(2)}: ${p.reviews_total.toLocaleString()} reviews`))
            .on('mouseout', hideTooltip);

        if (correlation.trend) {
            const { slope, intercept } = correlation.trend;
            const [x0, x1] = x.domain();
            // Clamp fitted values into the log domain
            const fit = v => Math.max(1, slope * v + intercept);
            svg.append('line')
                .attr('x1', x(x0)).attr('y1', y(fit(x0)))
                .attr('x2', x(x1)).attr('y2', y(fit(x1)))
                .attr('stroke', '#f85149')
                .attr('stroke-width', 2)
                .attr('stroke-dasharray', '6,4');
        }

        svg.append('g')
            .attr('transform', `translate(0,${height})`)
            .call(d3.axisBottom(x).ticks(8).tickFormat(d => '$' + d))
            .style('color', color('dim'));
        svg.append('g')
            .call(d3.axisLeft(y).ticks(5, '~s'))
            .style('color', color('dim'));
    }

    // Mean positive ratio per genre
    function drawGenreRatios() {
        if (digest.genre_ratios === null) {
            const div = document.createElement('div');
            div.className = 'chart-error';
            div.textContent = digest.genre_ratios_error;
            document.getElementById('genre-ratios').appendChild(div);
            return;
        }
        const data = digest.genre_ratios;
        if (!data.length) return markEmpty('genre-ratios');

        const margin = { top: 10, right: 45, bottom: 30, left: 130 };
        const { svg, width, height } = chartArea('genre-ratios', 320, margin);

        const y = d3.scaleBand().domain(data.map(d => d.genre)).range([0, height]).padding(0.2);
        const x = d3.scaleLinear().domain([0, 1]).range([0, width]);

        svg.selectAll('rect')
            .data(data)
            .enter()
            .append('rect')
            .attr('y', d => y(d.genre))
            .attr('height', y.bandwidth())
            .attr('width', d => x(d.mean_positive_ratio))
            .attr('rx', 3)
            .attr('fill', color('ratio'))
            .on('mouseover', (event, d) => showTooltip(event,
                `${d.genre}: ${(d.mean_positive_ratio * 100).toFixed(1)}% over ${d.sampled_games} games`))
            .on('mouseout', hideTooltip);

        svg.append('g').call(d3.axisLeft(y)).style('color', color('dim'));
        svg.append('g')
            .attr('transform', `translate(0,${height})`)
            .call(d3.axisBottom(x).ticks(5).tickFormat(d3.format('.0%')))
            .style('color', color('dim'));
    }

    // Calendar-month launch counts, partial year excluded
    function drawSeasonality() {
        const data = digest.seasonality;
        if (!data.some(m => m.count > 0)) return markEmpty('seasonality');

        const margin = { top: 10, right: 10, bottom: 35, left: 50 };
        const { svg, width, height } = chartArea('seasonality', 320, margin);

        const x = d3.scaleBand().domain(data.map(m => m.label)).range([0, width]).padding(0.25);
        const y = d3.scaleLinear().domain([0, d3.max(data, m => m.count)]).range([height, 0]);

        svg.selectAll('rect')
            .data(data)
            .enter()
            .append('rect')
            .attr('x', m => x(m.label))
            .attr('width', x.bandwidth())
            .attr('y', m => y(m.count))
            .attr('height', m => height - y(m.count))
            .attr('rx', 3)
            .attr('fill', color('launch'))
            .on('mouseover', (event, m) => showTooltip(event, `${m.label}: ${m.count} launches`))
            .on('mouseout', hideTooltip);

        svg.append('g')
            .attr('transform', `translate(0,${height})`)
            .call(d3.axisBottom(x))
            .style('color', color('dim'));
        svg.append('g').call(d3.axisLeft(y).ticks(6)).style('color', color('dim'));
    }

    drawTopReviewed();
    drawPriceHistogram();
    drawTopGenres();
    drawLaunchEvolution();
    drawCorrelation();
    drawGenreRatios();
    drawSeasonality();
    </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::path::PathBuf;

    // ==========================================================================
    // HTML REPORT TESTS
    // ==========================================================================
    //
    // The report is a single self-contained page: digest data inline, one
    // draw function per analysis. These check the template wiring, not the
    // JS rendering.
    // ==========================================================================

    fn render_empty() -> String {
        let catalog = Catalog {
            records: Vec::new(),
            source: PathBuf::from("empty.csv"),
            has_positive_reviews: true,
        };
        let digest = Digest::from_catalog(&catalog, 50);
        let mut buffer = Vec::new();
        write(&mut buffer, &digest).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_html_embeds_digest() {
        let html = render_empty();
        assert!(html.contains("const digest = {"));
        assert!(!html.contains("__DIGEST_JSON__"));
    }

    #[test]
    fn test_html_defines_a_draw_function_per_analysis() {
        let html = render_empty();
        for function in [
            "drawTopReviewed",
            "drawPriceHistogram",
            "drawTopGenres",
            "drawLaunchEvolution",
            "drawCorrelation",
            "drawGenreRatios",
            "drawSeasonality",
        ] {
            assert!(
                html.contains(&format!("function {}()", function)),
                "missing {}",
                function
            );
            assert!(html.contains(&format!("{}();", function)));
        }
    }

    #[test]
    fn test_html_escapes_script_closers_in_names() {
        use crate::catalog::GameRecord;
        let catalog = Catalog {
            records: vec![GameRecord {
                name: "</script><b>x".to_string(),
                release_date: None,
                price: 1.0,
                num_reviews_total: 5,
                num_reviews_positive: None,
                genres: Vec::new(),
                year: None,
                month: None,
                semester: None,
            }],
            source: PathBuf::from("test.csv"),
            has_positive_reviews: true,
        };
        let digest = Digest::from_catalog(&catalog, 50);
        let mut buffer = Vec::new();
        write(&mut buffer, &digest).unwrap();
        let html = String::from_utf8(buffer).unwrap();
        assert!(!html.contains("</script><b>x"));
    }
}
