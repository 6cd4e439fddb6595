pub mod trace_refresh;
