//! The built-in upstream catalog.
//!
//! Declaration order is what `/map/list/` serves, so sources are grouped by
//! family: Google, OpenStreetMap and friends, ArcGIS, Bing, then the
//! Chinese providers that need datum treatment, and finally Google Earth
//! Enterprise.

use crate::descriptor::Driver::{Gee, Quadtree, Template, TencentSatellite, Warp};
use crate::descriptor::{ProviderDescriptor, WarpDatum};
use tilegate_core::CoordinateSystem::{Bd09, Cgcs2000, Gcj02, Wgs84};
use tilegate_core::TileContentType::Jpeg;

/// All upstream sources, in display order.
pub fn catalog() -> Vec<ProviderDescriptor> {
	vec![
		ProviderDescriptor::new(
			"google_satellite",
			"Google Satellite",
			"https://khms{serverpart:0,1,2,3}.google.com/kh/v=979?x={x}&y={y}&z={z}",
			Template,
			Wgs84,
		)
		.with_zoom(0, 21)
		.with_content_type(Jpeg),
		ProviderDescriptor::new(
			"google_satellite_label",
			"Google Satellite with Label",
			"https://www.google.com/maps/vt?lyrs=y@189&x={x}&y={y}&z={z}",
			Template,
			Wgs84,
		)
		.with_zoom(0, 21),
		ProviderDescriptor::new(
			"google_pure_satellite",
			"Google Pure Satellite",
			"https://www.google.com/maps/vt?lyrs=s@189&x={x}&y={y}&z={z}",
			Template,
			Wgs84,
		)
		.with_zoom(0, 21),
		ProviderDescriptor::new(
			"osm_standard",
			"OpenStreetMap Standard",
			"https://tile.openstreetmap.org/{z}/{x}/{y}.png",
			Template,
			Wgs84,
		)
		.with_zoom(0, 19)
		.with_referer("https://www.openstreetmap.org/"),
		ProviderDescriptor::new(
			"osm_gps",
			"OpenStreetMap Public GPS Traces",
			"https://gps.tile.openstreetmap.org/lines/{z}/{x}/{y}.png",
			Template,
			Wgs84,
		)
		.with_zoom(0, 19)
		.with_referer("https://www.openstreetmap.org/"),
		ProviderDescriptor::new(
			"osm_cyclosm",
			"OpenStreetMap CyclOSM",
			"https://{serverpart:a,b,c}.tile-cyclosm.openstreetmap.fr/cyclosm/{z}/{x}/{y}.png",
			Template,
			Wgs84,
		)
		.with_zoom(0, 19)
		.with_referer("https://www.openstreetmap.org/"),
		ProviderDescriptor::new(
			"tracestrack_topo",
			"Tracestrack Topo",
			"https://tile.tracestrack.com/topo__/{z}/{x}/{y}.png",
			Template,
			Wgs84,
		)
		.with_referer("https://www.openstreetmap.org/"),
		ProviderDescriptor::new(
			"openrailwaymap",
			"OpenRailwayMap",
			"https://{serverpart:a,b,c}.tiles.openrailwaymap.org/standard/{z}/{x}/{y}.png",
			Template,
			Wgs84,
		)
		.with_zoom(0, 19)
		.with_referer("https://www.openrailwaymap.org/"),
		ProviderDescriptor::new(
			"arcgis_satellite",
			"ArcGIS World Imagery",
			"https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
			Template,
			Wgs84,
		)
		.with_content_type(Jpeg),
		ProviderDescriptor::new(
			"bing_satellite",
			"Bing Satellite",
			"https://t.ssl.ak.tiles.virtualearth.net/tiles/a{quadkey}.jpeg?g=14482&n=z&prx=1",
			Quadtree,
			Wgs84,
		)
		.with_zoom(1, 19)
		.with_referer("https://www.bing.com/maps")
		.with_content_type(Jpeg),
		ProviderDescriptor::new(
			"amap_road",
			"Amap Road",
			"https://webst0{serverpart:1,2,3,4}.is.autonavi.com/appmaptile?style=8&x={x}&y={y}&z={z}",
			Warp { datum: WarpDatum::Gcj02 },
			Gcj02,
		)
		.with_zoom(3, 18)
		.with_referer("https://www.amap.com/"),
		ProviderDescriptor::new(
			"amap_satellite",
			"Amap Satellite",
			"https://webst0{serverpart:1,2,3,4}.is.autonavi.com/appmaptile?style=6&x={x}&y={y}&z={z}",
			Warp { datum: WarpDatum::Gcj02 },
			Gcj02,
		)
		.with_zoom(3, 18)
		.with_referer("https://www.amap.com/")
		.with_content_type(Jpeg),
		ProviderDescriptor::new(
			"google_satellite_gcj02",
			"Google Satellite (GCJ02)",
			"https://mt{serverpart:0,1,2,3}.google.cn/vt/lyrs=s&x={x}&y={y}&z={z}",
			Warp { datum: WarpDatum::Gcj02 },
			Gcj02,
		)
		.with_zoom(3, 18)
		.with_content_type(Jpeg),
		ProviderDescriptor::new(
			"baidu_satellite",
			"Baidu Satellite",
			"https://maponline0.bdimg.com/starpic/?qt=satepc&u=x={x};y={y};z={z};v=009;type=sate&fm=46&app=webearth2&v=009&udt=20250515",
			Warp { datum: WarpDatum::Bd09 },
			Bd09,
		)
		.with_zoom(3, 18)
		.with_referer("https://map.baidu.com/")
		.tms(),
		ProviderDescriptor::new(
			"tianditu_satellite",
			"TianDiTu Satellite",
			"https://t{serverpart:0,1,2,3,4,5,6,7}.tianditu.gov.cn/DataServer?T=img_w&x={x}&y={y}&l={z}",
			Template,
			Cgcs2000,
		)
		.with_referer("https://www.tianditu.gov.cn/")
		.with_content_type(Jpeg),
		ProviderDescriptor::new(
			"tianditu_road",
			"TianDiTu Road",
			"https://t{serverpart:0,1,2,3,4,5,6,7}.tianditu.gov.cn/DataServer?T=vec_w&x={x}&y={y}&l={z}",
			Template,
			Cgcs2000,
		)
		.with_referer("https://www.tianditu.gov.cn/"),
		ProviderDescriptor::new(
			"tencent_road",
			"Tencent Road",
			"https://rt{serverpart:0,1,2,3}.map.gtimg.com/tile?z={z}&x={x}&y={y}&styleid=1&version=297",
			Warp { datum: WarpDatum::Gcj02 },
			Gcj02,
		)
		.with_zoom(3, 18)
		.with_referer("https://map.qq.com/")
		.tms(),
		ProviderDescriptor::new(
			"tencent_satellite",
			"Tencent Satellite",
			"https://p{serverpart:0,1,2,3}.map.gtimg.com/sateTiles/{z}/{x/16}/{y/16}/{x}_{y}.jpg",
			TencentSatellite,
			Gcj02,
		)
		.with_zoom(3, 18)
		.with_referer("https://map.qq.com/")
		.with_content_type(Jpeg),
		ProviderDescriptor::new(
			"tuxun_huawei_street",
			"Tuxun Huawei Petal Street",
			"https://maprastertile.dbankcdn.cn/display-service/v1/online-render/getTile/24.12.10.10/{z}/{x}/{y}/",
			Template,
			Wgs84,
		)
		.with_referer("https://tuxun.fun/")
		.with_origin("https://tuxun.fun"),
		ProviderDescriptor::new("google_earth", "Google Earth Enterprise", "", Gee, Wgs84)
			.with_zoom(0, 22)
			.with_content_type(Jpeg),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn catalog_has_every_driver_kind() {
		let sources = catalog();
		assert!(sources.iter().any(|s| s.driver == Template));
		assert!(sources.iter().any(|s| s.driver == Quadtree));
		assert!(sources.iter().any(|s| s.driver == TencentSatellite));
		assert!(sources.iter().any(|s| s.driver == Warp { datum: WarpDatum::Gcj02 }));
		assert!(sources.iter().any(|s| s.driver == Warp { datum: WarpDatum::Bd09 }));
		assert!(sources.iter().any(|s| s.driver == Gee));
	}

	#[test]
	fn tms_sources_are_warped_chinese_upstreams() {
		for source in catalog() {
			if source.is_tms {
				assert!(
					matches!(source.driver, Warp { .. } | TencentSatellite),
					"'{}' is TMS but not a warped source",
					source.id
				);
			}
		}
	}

	#[test]
	fn only_the_gee_source_lacks_a_url_template() {
		for source in catalog() {
			assert_eq!(source.url_template.is_empty(), source.driver == Gee, "'{}'", source.id);
		}
	}
}
